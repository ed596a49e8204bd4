//! In-memory event bus for tests/dev.

use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::bus::{EventBus, Subscription};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("in-memory bus lock poisoned")]
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out; dropped subscriptions are pruned on publish
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered subscriptions.
    ///
    /// Includes every subscription made since the last publish; dropped ones are
    /// only pruned when the next publish finds them closed.
    pub fn subscriber_count(&self) -> Result<usize, InMemoryBusError> {
        let subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;
        Ok(subs.len())
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just never receives.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_a_copy() {
        let bus = InMemoryEventBus::<String>::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish("sale created".to_string()).unwrap();

        assert_eq!(a.try_recv().unwrap(), "sale created");
        assert_eq!(b.try_recv().unwrap(), "sale created");
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = InMemoryEventBus::<u32>::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(7).unwrap();

        assert_eq!(bus.subscriber_count(), Ok(1));
        assert_eq!(keep.drain(), vec![7]);
    }

    #[test]
    fn count_includes_subscriptions_made_after_publish() {
        let bus = InMemoryEventBus::<u32>::new();
        let _first = bus.subscribe();
        bus.publish(1).unwrap();
        let _second = bus.subscribe();

        assert_eq!(bus.subscriber_count(), Ok(2));
    }

    #[test]
    fn poisoned_bus_reports_an_error() {
        let bus = std::sync::Arc::new(InMemoryEventBus::<u32>::new());
        let holder = bus.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.subscribers.lock().unwrap();
            panic!("subscriber registry poisoned");
        })
        .join();

        assert_eq!(bus.subscriber_count(), Err(InMemoryBusError::Poisoned));
        assert_eq!(bus.publish(1), Err(InMemoryBusError::Poisoned));
    }
}
