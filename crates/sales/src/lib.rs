//! Sales domain module.
//!
//! Business rules for sales and their line items, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod event;
pub mod item;
pub mod sale;

pub use event::{ItemCancelled, SaleCancelled, SaleCreated, SaleEvent, SaleModified};
pub use item::{DiscountTier, MAX_IDENTICAL_ITEMS, SaleItem, SaleItemInput, line_total};
pub use sale::{DEFAULT_CANCEL_REASON, ITEM_REMOVED_REASON, Sale, SaleDetails};
