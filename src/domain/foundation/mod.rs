//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, events and error types
//! that form the vocabulary of the contract tracking domain.

mod command;
mod errors;
mod events;
mod ids;
mod percentage;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::{ContractId, SignatureId, UserId};
pub use percentage::Percentage;
pub use timestamp::Timestamp;
