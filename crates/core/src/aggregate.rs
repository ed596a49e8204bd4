//! Aggregate root traits for state-based domain models.

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
///
/// Kept small so domain modules decide how they model state transitions
/// without bringing in any infrastructure concerns.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per successful mutating operation.
    fn version(&self) -> u64;
}

/// Aggregates that queue domain events for later publication.
///
/// The buffer is an explicit hand-off: whoever publishes the events for a unit of
/// work is responsible for draining it afterwards.
pub trait HasDomainEvents {
    type Event: Clone + core::fmt::Debug;

    /// Pending events, oldest first.
    fn domain_events(&self) -> &[Self::Event];

    /// Drop all pending events.
    fn clear_domain_events(&mut self);

    /// Drain all pending events, leaving the buffer empty.
    fn take_domain_events(&mut self) -> Vec<Self::Event>;
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking.
    Any,
    /// Require the stored aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
