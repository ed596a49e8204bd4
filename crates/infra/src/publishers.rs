//! Event sinks for domain events.
//!
//! - [`TracingEventPublisher`]: one structured log record per event
//! - [`BusEventPublisher`]: forwards to any [`EventBus`]
//! - [`RecordingEventPublisher`]: keeps events in memory (tests/dev)
//! - [`FanOutPublisher`]: publishes to several sinks in order

use std::sync::{Arc, Mutex};

use serde::Serialize;

use salesdesk_events::{Event, EventBus, EventPublisher, PublishError};

/// Writes each event to the tracing pipeline as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

impl<E> EventPublisher<E> for TracingEventPublisher
where
    E: Event + Serialize,
{
    fn publish(&self, event: &E) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)
            .map_err(|e| PublishError::new(event.event_type(), e.to_string()))?;

        tracing::info!(
            event_type = event.event_type(),
            event_version = event.version(),
            occurred_at = %event.occurred_at(),
            payload = %payload,
            "domain event published"
        );
        Ok(())
    }
}

/// Adapter from the publisher capability to a pub/sub bus.
#[derive(Debug)]
pub struct BusEventPublisher<B> {
    bus: B,
}

impl<B> BusEventPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<E, B> EventPublisher<E> for BusEventPublisher<B>
where
    E: Event,
    B: EventBus<E>,
{
    fn publish(&self, event: &E) -> Result<(), PublishError> {
        self.bus
            .publish(event.clone())
            .map_err(|err| PublishError::new(event.event_type(), format!("{err:?}")))
    }
}

/// Keeps every published event in memory.
///
/// Can be told to reject one event type, which lets tests exercise the
/// failure path of a unit of work.
#[derive(Debug)]
pub struct RecordingEventPublisher<E> {
    events: Mutex<Vec<E>>,
    reject: Mutex<Option<&'static str>>,
}

impl<E> Default for RecordingEventPublisher<E> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            reject: Mutex::new(None),
        }
    }
}

impl<E: Clone> RecordingEventPublisher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, oldest first.
    pub fn published(&self) -> Vec<E> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Fail every subsequent publish of `event_type`; `None` accepts everything again.
    pub fn reject(&self, event_type: Option<&'static str>) {
        if let Ok(mut reject) = self.reject.lock() {
            *reject = event_type;
        }
    }
}

impl<E: Event> EventPublisher<E> for RecordingEventPublisher<E> {
    fn publish(&self, event: &E) -> Result<(), PublishError> {
        let rejected = self
            .reject
            .lock()
            .map_err(|_| PublishError::new(event.event_type(), "lock poisoned"))?;
        if *rejected == Some(event.event_type()) {
            return Err(PublishError::new(event.event_type(), "rejected by sink"));
        }

        self.events
            .lock()
            .map_err(|_| PublishError::new(event.event_type(), "lock poisoned"))?
            .push(event.clone());
        Ok(())
    }
}

/// Publishes to each inner sink in order, stopping at the first failure.
pub struct FanOutPublisher<E> {
    sinks: Vec<Arc<dyn EventPublisher<E>>>,
}

impl<E> FanOutPublisher<E> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, sink: Arc<dyn EventPublisher<E>>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl<E> Default for FanOutPublisher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for FanOutPublisher<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FanOutPublisher")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl<E> EventPublisher<E> for FanOutPublisher<E> {
    fn publish(&self, event: &E) -> Result<(), PublishError> {
        for sink in &self.sinks {
            sink.publish(event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use salesdesk_core::SaleId;
    use salesdesk_events::InMemoryEventBus;
    use salesdesk_sales::{SaleCancelled, SaleEvent};

    fn cancelled() -> SaleEvent {
        SaleEvent::SaleCancelled(SaleCancelled {
            sale_id: SaleId::new(),
            reason: "Deleted via API".to_string(),
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn tracing_publisher_accepts_serializable_events() {
        assert!(TracingEventPublisher.publish(&cancelled()).is_ok());
    }

    #[test]
    fn bus_publisher_forwards_to_subscribers() {
        let bus = Arc::new(InMemoryEventBus::<SaleEvent>::new());
        let sub = bus.subscribe();
        let publisher = BusEventPublisher::new(bus.clone());
        let event = cancelled();

        publisher.publish(&event).unwrap();

        assert_eq!(sub.try_recv().unwrap(), event);
    }

    #[test]
    fn recording_publisher_can_reject_a_type() {
        let publisher = RecordingEventPublisher::<SaleEvent>::new();
        publisher.reject(Some("sales.sale.cancelled"));

        let err = publisher.publish(&cancelled()).unwrap_err();
        assert_eq!(err.event_type, "sales.sale.cancelled");
        assert!(publisher.published().is_empty());

        publisher.reject(None);
        publisher.publish(&cancelled()).unwrap();
        assert_eq!(publisher.published().len(), 1);
    }

    #[test]
    fn fan_out_stops_at_first_failure() {
        let first = Arc::new(RecordingEventPublisher::<SaleEvent>::new());
        let second = Arc::new(RecordingEventPublisher::<SaleEvent>::new());
        let third = Arc::new(RecordingEventPublisher::<SaleEvent>::new());
        second.reject(Some("sales.sale.cancelled"));

        let fan_out = FanOutPublisher::<SaleEvent>::new()
            .with(first.clone())
            .with(second.clone())
            .with(third.clone());

        assert!(fan_out.publish(&cancelled()).is_err());
        assert_eq!(first.published().len(), 1);
        assert!(third.published().is_empty());
    }
}
