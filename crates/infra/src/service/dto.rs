//! Request and result shapes of the sales service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salesdesk_core::{CustomerId, ProductId, SaleId, SaleItemId};
use salesdesk_sales::{Sale, SaleDetails, SaleItem, SaleItemInput};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl From<SaleItemRequest> for SaleItemInput {
    fn from(value: SaleItemRequest) -> Self {
        SaleItemInput::new(value.product_id, value.product_name, value.quantity, value.unit_price)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    pub sale_number: u32,
    pub sale_date: DateTime<Utc>,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub branch: String,
    pub items: Vec<SaleItemRequest>,
}

/// Full replacement of a sale's header and items; the id travels separately.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSaleRequest {
    pub sale_number: u32,
    pub sale_date: DateTime<Utc>,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub branch: String,
    pub items: Vec<SaleItemRequest>,
}

macro_rules! impl_into_parts {
    ($t:ty) => {
        impl $t {
            pub(crate) fn into_parts(self) -> (SaleDetails, Vec<SaleItemInput>) {
                let details = SaleDetails {
                    sale_number: self.sale_number,
                    sale_date: self.sale_date,
                    customer_id: self.customer_id,
                    customer_name: self.customer_name,
                    branch: self.branch,
                };
                let items = self.items.into_iter().map(SaleItemInput::from).collect();
                (details, items)
            }
        }
    };
}

impl_into_parts!(CreateSaleRequest);
impl_into_parts!(UpdateSaleRequest);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSalesRequest {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// e.g. `"SaleDate desc, Branch asc"`
    pub order: Option<String>,
    pub branch: Option<String>,
    pub min_date: Option<DateTime<Utc>>,
    pub max_date: Option<DateTime<Utc>>,
}

// -------------------------
// Result DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleItemView {
    pub id: SaleItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount_percentage: Decimal,
    pub total_item_amount: Decimal,
    pub is_cancelled: bool,
}

impl From<&SaleItem> for SaleItemView {
    fn from(item: &SaleItem) -> Self {
        Self {
            id: item.id_typed(),
            product_id: item.product_id(),
            product_name: item.product_name().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            discount_percentage: item.discount_percentage(),
            total_item_amount: item.total_item_amount(),
            is_cancelled: item.is_cancelled(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleView {
    pub id: SaleId,
    pub sale_number: u32,
    pub sale_date: DateTime<Utc>,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub branch: String,
    pub total_amount: Decimal,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<SaleItemView>,
}

impl From<&Sale> for SaleView {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id_typed(),
            sale_number: sale.sale_number(),
            sale_date: sale.sale_date(),
            customer_id: sale.customer_id(),
            customer_name: sale.customer_name().to_string(),
            branch: sale.branch().to_string(),
            total_amount: sale.total_amount(),
            is_cancelled: sale.is_cancelled(),
            created_at: sale.created_at(),
            updated_at: sale.updated_at(),
            items: sale.items().iter().map(SaleItemView::from).collect(),
        }
    }
}

/// One row of a sale listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleSummary {
    pub id: SaleId,
    pub sale_number: u32,
    pub sale_date: DateTime<Utc>,
    pub customer_name: String,
    pub branch: String,
    pub total_amount: Decimal,
    pub is_cancelled: bool,
    pub item_count: usize,
}

impl From<&Sale> for SaleSummary {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id_typed(),
            sale_number: sale.sale_number(),
            sale_date: sale.sale_date(),
            customer_name: sale.customer_name().to_string(),
            branch: sale.branch().to_string(),
            total_amount: sale.total_amount(),
            is_cancelled: sale.is_cancelled(),
            item_count: sale.items().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleListPage {
    pub data: Vec<SaleSummary>,
    pub total_items: u64,
    pub current_page: u32,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_deserializes_from_wire_json() {
        let customer = CustomerId::new();
        let product = ProductId::new();
        let body = json!({
            "sale_number": 12,
            "sale_date": "2024-05-01T10:00:00Z",
            "customer_id": customer.to_string(),
            "customer_name": "Ana Paula",
            "branch": "Pinheiros",
            "items": [
                {"product_id": product.to_string(), "product_name": "Brahma 1L", "quantity": 4, "unit_price": "7.50"}
            ]
        });

        let req: CreateSaleRequest = serde_json::from_value(body).unwrap();
        let (details, items) = req.into_parts();

        assert_eq!(details.customer_id, customer);
        assert_eq!(details.branch, "Pinheiros");
        assert_eq!(items[0].product_id, product);
        assert_eq!(items[0].unit_price, Decimal::new(750, 2));
    }
}
