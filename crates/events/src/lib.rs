//! Domain event mechanics: the event contract, publishing sinks and pub/sub.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod publisher;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use publisher::{EventPublisher, PublishError};
