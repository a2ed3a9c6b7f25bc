//! `storefront-events` — event & command abstractions.
//!
//! Post-commit domain events, the side-effect command contract, and the
//! pub/sub seam towards eventually-consistent read models.

mod bus;
mod command;
mod envelope;
mod event;
mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use command::Command;
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
