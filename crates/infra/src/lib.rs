//! Infrastructure & application layer: repositories, event publishing, the
//! sales service and its configuration.

pub mod config;
pub mod dispatcher;
pub mod publishers;
pub mod repository;
pub mod service;


pub use config::{ConfigError, ListingConfig};
pub use dispatcher::DomainEventsDispatcher;
pub use publishers::{BusEventPublisher, FanOutPublisher, RecordingEventPublisher, TracingEventPublisher};
pub use repository::{InMemorySaleRepository, RepositoryError, SaleRepository};
pub use service::{SalesService, ServiceError};
