//! Progress module - contracts, signatures and per-bucket progress records.

mod contract;
mod errors;
mod events;
mod record;
mod signature;

pub use contract::{Contract, ContractVersion};
pub use errors::ContractError;
pub use events::{ContractCreated, ProgressUpdated, SignatureAdded};
pub use record::{PercentageSource, ProgressRecord};
pub use signature::{Signature, SignatureStatus};
