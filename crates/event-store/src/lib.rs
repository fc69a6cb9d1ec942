pub mod bus;
pub mod error;
pub mod event;
pub mod memory;
pub mod query;
pub mod store;

pub use bus::{EventBus, EventSubscriber, MetricsSubscriber, TracingSubscriber};
pub use common::{AggregateCategory, AggregateId};
pub use error::{EventStoreError, Result};
pub use event::{Event, EventEnvelope, EventId, Sequence};
pub use memory::InMemoryEventStore;
pub use query::EventQuery;
pub use store::{AppendOptions, EventStore, EventStoreExt};
