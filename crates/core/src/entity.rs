//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Child entities of an aggregate (e.g. sale items) implement this so callers can
/// refer to them by identity without reaching into the aggregate's internals.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
