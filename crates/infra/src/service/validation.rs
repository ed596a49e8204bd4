//! Request validation.
//!
//! Every rule is checked and all failures are reported together in a single
//! `DomainError::Validation`, messages separated by `"; "`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use salesdesk_core::{DomainError, DomainResult};
use salesdesk_sales::MAX_IDENTICAL_ITEMS;

use crate::config::ListingConfig;
use crate::repository::{PageRequest, SaleFilter, SortOrder};

use super::dto::{CreateSaleRequest, ListSalesRequest, SaleItemRequest, UpdateSaleRequest};

pub const MAX_CUSTOMER_NAME_LEN: usize = 100;
pub const MAX_BRANCH_LEN: usize = 50;
pub const MAX_PRODUCT_NAME_LEN: usize = 100;

#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn check(&mut self, ok: bool, msg: impl FnOnce() -> String) {
        if !ok {
            self.0.push(msg());
        }
    }

    fn text(&mut self, field: &str, value: &str, max_len: usize) {
        self.check(!value.trim().is_empty(), || format!("{field} must not be blank"));
        self.check(value.chars().count() <= max_len, || {
            format!("{field} must be at most {max_len} characters")
        });
    }

    fn finish(self) -> DomainResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.0.join("; ")))
        }
    }
}

struct Header<'a> {
    sale_number: u32,
    customer_is_nil: bool,
    customer_name: &'a str,
    branch: &'a str,
    items: &'a [SaleItemRequest],
}

fn validate_header(header: Header<'_>) -> DomainResult<()> {
    let mut v = Violations::default();

    v.check(header.sale_number > 0, || "sale number must be greater than 0".to_string());
    v.check(!header.customer_is_nil, || "customer id must not be empty".to_string());
    v.text("customer name", header.customer_name, MAX_CUSTOMER_NAME_LEN);
    v.text("branch", header.branch, MAX_BRANCH_LEN);

    v.check(!header.items.is_empty(), || "a sale needs at least one item".to_string());
    for (i, item) in header.items.iter().enumerate() {
        v.check(!item.product_id.is_nil(), || format!("items[{i}]: product id must not be empty"));
        v.text(&format!("items[{i}]: product name"), &item.product_name, MAX_PRODUCT_NAME_LEN);
        v.check((1..=MAX_IDENTICAL_ITEMS).contains(&item.quantity), || {
            format!("items[{i}]: quantity must be between 1 and {MAX_IDENTICAL_ITEMS}")
        });
        v.check(item.unit_price > Decimal::ZERO, || {
            format!("items[{i}]: unit price must be greater than 0")
        });
    }

    v.finish()
}

pub fn validate_create(req: &CreateSaleRequest) -> DomainResult<()> {
    validate_header(Header {
        sale_number: req.sale_number,
        customer_is_nil: req.customer_id.is_nil(),
        customer_name: &req.customer_name,
        branch: &req.branch,
        items: &req.items,
    })
}

pub fn validate_update(req: &UpdateSaleRequest) -> DomainResult<()> {
    validate_header(Header {
        sale_number: req.sale_number,
        customer_is_nil: req.customer_id.is_nil(),
        customer_name: &req.customer_name,
        branch: &req.branch,
        items: &req.items,
    })
}

/// Repository criteria derived from a valid listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: SaleFilter,
    pub order: SortOrder,
    pub page: PageRequest,
}

pub fn validate_list(
    req: &ListSalesRequest,
    config: &ListingConfig,
    now: DateTime<Utc>,
) -> DomainResult<ListQuery> {
    let mut v = Violations::default();

    let page = req.page.unwrap_or(1);
    let size = req.size.unwrap_or(config.default_page_size);
    v.check(page >= 1, || "page must be at least 1".to_string());
    v.check((1..=config.max_page_size).contains(&size), || {
        format!("size must be between 1 and {}", config.max_page_size)
    });

    let order = match req.order.as_deref().unwrap_or("").parse::<SortOrder>() {
        Ok(order) => order,
        Err(DomainError::Validation(msg)) => {
            v.0.push(msg);
            SortOrder::default()
        }
        Err(other) => return Err(other),
    };

    v.check(req.min_date.is_none_or(|d| d <= now), || {
        "min date must not be in the future".to_string()
    });
    v.check(req.max_date.is_none_or(|d| d <= now), || {
        "max date must not be in the future".to_string()
    });
    if let (Some(min), Some(max)) = (req.min_date, req.max_date) {
        v.check(min <= max, || "min date must not be after max date".to_string());
    }

    v.finish()?;

    Ok(ListQuery {
        filter: SaleFilter {
            branch: req.branch.clone(),
            min_date: req.min_date,
            max_date: req.max_date,
        },
        order,
        page: PageRequest::new(page, size),
    })
}
