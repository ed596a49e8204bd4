//! Event sink abstraction.
//!
//! A publisher is the single capability the application layer needs to notify
//! the outside world. How the event travels (log line, bus, broker) is up to the
//! implementation; the caller only learns whether it was accepted.

use std::sync::Arc;

use thiserror::Error;

/// Failure to hand an event to its sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to publish {event_type}: {reason}")]
pub struct PublishError {
    pub event_type: String,
    pub reason: String,
}

impl PublishError {
    pub fn new(event_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            reason: reason.into(),
        }
    }
}

/// Injected event sink.
pub trait EventPublisher<E>: Send + Sync {
    fn publish(&self, event: &E) -> Result<(), PublishError>;
}

impl<E, P> EventPublisher<E> for Arc<P>
where
    P: EventPublisher<E> + ?Sized,
{
    fn publish(&self, event: &E) -> Result<(), PublishError> {
        (**self).publish(event)
    }
}
