//! `salesdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion, HasDomainEvents};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ProductId, SaleId, SaleItemId};
pub use value_object::ValueObject;
