//! In-process publish/subscribe for domain events

pub mod bus;

pub use bus::{EventBus, EventSubscriber};
