//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ProgressRepository` - Contract and per-year record persistence
//! - `EventPublisher` - Port for publishing domain events

mod event_publisher;
mod progress_repository;

pub use event_publisher::EventPublisher;
pub use progress_repository::{ProgressRepository, YearRecords};
