//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances with
/// the same attributes are interchangeable. To "modify" one, build a new one.
///
/// - **Value Object**: a discount tier, an amount of money
/// - **Entity**: a sale item, which keeps its identity while its data changes
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
