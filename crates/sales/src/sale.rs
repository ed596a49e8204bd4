use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salesdesk_core::{
    AggregateRoot, CustomerId, DomainError, DomainResult, HasDomainEvents, ProductId, SaleId,
};

use crate::event::{ItemCancelled, SaleCancelled, SaleCreated, SaleEvent, SaleModified};
use crate::item::{SaleItem, SaleItemInput};

/// Reason recorded on `SaleCancelled` when the caller gives none.
pub const DEFAULT_CANCEL_REASON: &str = "sale cancelled";

/// Reason recorded on `ItemCancelled` for products dropped by an update.
pub const ITEM_REMOVED_REASON: &str = "item removed during update";

/// Scalar header of a sale, supplied on create and overwritten on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDetails {
    pub sale_number: u32,
    pub sale_date: DateTime<Utc>,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub branch: String,
}

/// Aggregate root: Sale.
///
/// Owns its items and its pending domain events. `total_amount` always equals the
/// sum of the item totals once a mutating call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    id: SaleId,
    sale_number: u32,
    sale_date: DateTime<Utc>,
    customer_id: CustomerId,
    customer_name: String,
    branch: String,
    is_cancelled: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    items: Vec<SaleItem>,
    total_amount: Decimal,
    version: u64,
    pending_events: Vec<SaleEvent>,
}

impl Sale {
    /// Build a new sale from `items`, emitting `SaleCreated`.
    ///
    /// Fails with `DomainError::BusinessRule` if any item exceeds the quantity cap;
    /// no sale is produced in that case.
    pub fn create(
        details: SaleDetails,
        items: &[SaleItemInput],
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let id = SaleId::new();
        let items = price_items(id, items)?;
        let total_amount = sum_totals(&items)?;

        let mut sale = Self {
            id,
            sale_number: details.sale_number,
            sale_date: details.sale_date,
            customer_id: details.customer_id,
            customer_name: details.customer_name,
            branch: details.branch,
            is_cancelled: false,
            created_at: occurred_at,
            updated_at: None,
            items,
            total_amount,
            version: 1,
            pending_events: Vec::new(),
        };

        sale.raise(SaleEvent::SaleCreated(SaleCreated {
            sale_id: sale.id,
            sale_number: sale.sale_number,
            customer_name: sale.customer_name.clone(),
            total_amount: sale.total_amount,
            occurred_at,
        }));

        Ok(sale)
    }

    /// Overwrite the header and replace every item.
    ///
    /// Emits one `ItemCancelled` per product that was present before and is absent
    /// now, then one `SaleModified`. On error the sale is left untouched.
    pub fn update(
        &mut self,
        details: SaleDetails,
        items: &[SaleItemInput],
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let replacement = price_items(self.id, items)?;
        let total_amount = sum_totals(&replacement)?;

        self.sale_number = details.sale_number;
        self.sale_date = details.sale_date;
        self.customer_id = details.customer_id;
        self.customer_name = details.customer_name;
        self.branch = details.branch;

        let previous = std::mem::replace(&mut self.items, replacement);
        self.total_amount = total_amount;

        let kept: HashSet<ProductId> = self.items.iter().map(SaleItem::product_id).collect();
        let mut reported = HashSet::new();
        for removed in previous.iter().filter(|i| !kept.contains(&i.product_id())) {
            if !reported.insert(removed.product_id()) {
                continue;
            }
            self.raise(SaleEvent::ItemCancelled(ItemCancelled {
                sale_id: self.id,
                item_id: removed.id_typed(),
                product_id: removed.product_id(),
                product_name: removed.product_name().to_string(),
                reason: ITEM_REMOVED_REASON.to_string(),
                occurred_at,
            }));
        }

        self.raise(SaleEvent::SaleModified(SaleModified {
            sale_id: self.id,
            sale_number: self.sale_number,
            total_amount: self.total_amount,
            occurred_at,
        }));

        self.updated_at = Some(occurred_at);
        self.version += 1;
        Ok(())
    }

    /// Cancel with [`DEFAULT_CANCEL_REASON`].
    pub fn cancel(&mut self, occurred_at: DateTime<Utc>) {
        self.cancel_with_reason(DEFAULT_CANCEL_REASON, occurred_at);
    }

    /// Mark the sale cancelled and emit `SaleCancelled`.
    ///
    /// There is no guard against repeated cancellation: every call emits an event.
    pub fn cancel_with_reason(&mut self, reason: impl Into<String>, occurred_at: DateTime<Utc>) {
        self.is_cancelled = true;
        self.raise(SaleEvent::SaleCancelled(SaleCancelled {
            sale_id: self.id,
            reason: reason.into(),
            occurred_at,
        }));
        self.version += 1;
    }

    pub fn id_typed(&self) -> SaleId {
        self.id
    }

    pub fn sale_number(&self) -> u32 {
        self.sale_number
    }

    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    fn raise(&mut self, event: SaleEvent) {
        self.pending_events.push(event);
    }
}

fn price_items(sale_id: SaleId, inputs: &[SaleItemInput]) -> DomainResult<Vec<SaleItem>> {
    inputs
        .iter()
        .map(|input| SaleItem::priced(sale_id, input))
        .collect()
}

fn sum_totals(items: &[SaleItem]) -> DomainResult<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.total_item_amount())
            .ok_or_else(|| DomainError::business_rule("sale total amount overflow"))
    })
}

impl AggregateRoot for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl HasDomainEvents for Sale {
    type Event = SaleEvent;

    fn domain_events(&self) -> &[SaleEvent] {
        &self.pending_events
    }

    fn clear_domain_events(&mut self) {
        self.pending_events.clear();
    }

    fn take_domain_events(&mut self) -> Vec<SaleEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
