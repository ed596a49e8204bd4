//! Hand-off of pending domain events to the event sink.
//!
//! Runs at the end of a unit of work, after the aggregate has been persisted:
//!
//! ```text
//! Request → aggregate operation → repository write → dispatch (publish, then clear)
//! ```
//!
//! The buffer is cleared only once every pending event has been accepted. If the
//! sink fails part-way, the events stay queued and a retry republishes all of them
//! (at-least-once; consumers must tolerate duplicates).

use salesdesk_core::HasDomainEvents;
use salesdesk_events::{Event, EventPublisher, PublishError};

#[derive(Debug)]
pub struct DomainEventsDispatcher<P> {
    publisher: P,
}

impl<P> DomainEventsDispatcher<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_inner(self) -> P {
        self.publisher
    }

    /// Publish the aggregate's pending events in order, then clear them.
    ///
    /// Returns the number of events published.
    pub fn dispatch<A>(&self, aggregate: &mut A) -> Result<usize, PublishError>
    where
        A: HasDomainEvents,
        A::Event: Event,
        P: EventPublisher<A::Event>,
    {
        let pending = aggregate.domain_events();
        for event in pending {
            self.publisher.publish(event).inspect_err(|err| {
                tracing::warn!(
                    event_type = event.event_type(),
                    error = %err,
                    "publishing domain event failed; events stay queued"
                );
            })?;
            tracing::debug!(event_type = event.event_type(), "domain event dispatched");
        }

        let published = pending.len();
        aggregate.clear_domain_events();
        Ok(published)
    }
}
