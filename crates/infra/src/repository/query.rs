//! Listing criteria: filtering, ordering and pagination of sales.

use core::cmp::Ordering;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salesdesk_core::DomainError;
use salesdesk_sales::Sale;

/// Sale attributes a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    SaleNumber,
    SaleDate,
    CustomerName,
    Branch,
    TotalAmount,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::SaleNumber,
        SortField::SaleDate,
        SortField::CustomerName,
        SortField::Branch,
        SortField::TotalAmount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::SaleNumber => "SaleNumber",
            SortField::SaleDate => "SaleDate",
            SortField::CustomerName => "CustomerName",
            SortField::Branch => "Branch",
            SortField::TotalAmount => "TotalAmount",
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
                DomainError::validation(format!(
                    "unknown sort field '{s}' (allowed: {})",
                    allowed.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(DomainError::validation(format!(
                "unknown sort direction '{s}' (allowed: asc, desc)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    fn compare(&self, a: &Sale, b: &Sale) -> Ordering {
        let ord = match self.field {
            SortField::SaleNumber => a.sale_number().cmp(&b.sale_number()),
            SortField::SaleDate => a.sale_date().cmp(&b.sale_date()),
            SortField::CustomerName => a.customer_name().cmp(b.customer_name()),
            SortField::Branch => a.branch().cmp(b.branch()),
            SortField::TotalAmount => a.total_amount().cmp(&b.total_amount()),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Ordered list of sort keys, parsed from strings like `"SaleDate desc, Branch asc"`.
///
/// An empty string means the default ordering, newest sale date first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder(Vec<SortKey>);

impl Default for SortOrder {
    fn default() -> Self {
        Self(vec![SortKey::new(SortField::SaleDate, SortDirection::Desc)])
    }
}

impl SortOrder {
    pub fn new(keys: Vec<SortKey>) -> Self {
        if keys.is_empty() {
            Self::default()
        } else {
            Self(keys)
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// Lexicographic comparison over the keys, first key most significant.
    pub fn compare(&self, a: &Sale, b: &Sale) -> Ordering {
        self.0
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let tokens: Vec<&str> = part.split_whitespace().collect();
            let (field, direction) = match tokens.as_slice() {
                [field] => (*field, SortDirection::Asc),
                [field, direction] => (*field, direction.parse()?),
                _ => {
                    return Err(DomainError::validation(format!(
                        "invalid order clause '{part}' (expected '<Field> [asc|desc]')"
                    )));
                }
            };
            keys.push(SortKey::new(field.parse()?, direction));
        }
        Ok(Self::new(keys))
    }
}

/// Listing filter. Every criterion is optional; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFilter {
    /// Substring the branch name must contain.
    pub branch: Option<String>,
    pub min_date: Option<DateTime<Utc>>,
    pub max_date: Option<DateTime<Utc>>,
}

impl SaleFilter {
    pub fn matches(&self, sale: &Sale) -> bool {
        let branch_ok = match self.branch.as_deref().map(str::trim) {
            Some(b) if !b.is_empty() => sale.branch().contains(b),
            _ => true,
        };
        let min_ok = self.min_date.is_none_or(|min| sale.sale_date() >= min);
        let max_ok = self.max_date.is_none_or(|max| sale.sale_date() <= max);
        branch_ok && min_ok && max_ok
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.size as usize)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePage {
    pub sales: Vec<Sale>,
    /// Number of sales matching the filter across all pages.
    pub total_items: u64,
    pub current_page: u32,
    pub total_pages: u64,
}

impl SalePage {
    pub fn new(sales: Vec<Sale>, total_items: u64, page: PageRequest) -> Self {
        let total_pages = if page.size == 0 {
            0
        } else {
            total_items.div_ceil(u64::from(page.size))
        };
        Self {
            sales,
            total_items,
            current_page: page.page,
            total_pages,
        }
    }
}
