use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salesdesk_core::{ProductId, SaleId, SaleItemId};
use salesdesk_events::Event;

/// Event: SaleCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCreated {
    pub sale_id: SaleId,
    pub sale_number: u32,
    pub customer_name: String,
    pub total_amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleModified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleModified {
    pub sale_id: SaleId,
    pub sale_number: u32,
    pub total_amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemCancelled. Refers to the item as it was before the update removed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCancelled {
    pub sale_id: SaleId,
    pub item_id: SaleItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCancelled {
    pub sale_id: SaleId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleEvent {
    SaleCreated(SaleCreated),
    SaleModified(SaleModified),
    ItemCancelled(ItemCancelled),
    SaleCancelled(SaleCancelled),
}

impl SaleEvent {
    pub fn sale_id(&self) -> SaleId {
        match self {
            SaleEvent::SaleCreated(e) => e.sale_id,
            SaleEvent::SaleModified(e) => e.sale_id,
            SaleEvent::ItemCancelled(e) => e.sale_id,
            SaleEvent::SaleCancelled(e) => e.sale_id,
        }
    }
}

impl Event for SaleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated(_) => "sales.sale.created",
            SaleEvent::SaleModified(_) => "sales.sale.modified",
            SaleEvent::ItemCancelled(_) => "sales.sale.item_cancelled",
            SaleEvent::SaleCancelled(_) => "sales.sale.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SaleEvent::SaleCreated(e) => e.occurred_at,
            SaleEvent::SaleModified(e) => e.occurred_at,
            SaleEvent::ItemCancelled(e) => e.occurred_at,
            SaleEvent::SaleCancelled(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_event_serializes_with_variant_tag() {
        let event = SaleEvent::SaleCancelled(SaleCancelled {
            sale_id: SaleId::new(),
            reason: "Deleted via API".to_string(),
            occurred_at: Utc::now(),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["SaleCancelled"]["reason"], "Deleted via API");
        assert_eq!(event.event_type(), "sales.sale.cancelled");
    }
}
