//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event bus implementations
//! - `memory` - In-memory persistence

pub mod events;
pub mod memory;

pub use events::InMemoryEventBus;
pub use memory::InMemoryProgressRepository;
