//! Event bus adapters and handler decorators.

mod idempotent_handler;
mod in_memory;
mod processed_store;

pub use idempotent_handler::IdempotentHandler;
pub use in_memory::InMemoryEventBus;
pub use processed_store::InMemoryProcessedEventStore;
