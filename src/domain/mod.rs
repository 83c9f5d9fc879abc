//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `schedule` - Reporting periods, buckets and the yearly partition
//! - `progress` - Contract aggregate and per-bucket progress records
//! - `migration` - Impact analysis and execution of period changes

pub mod foundation;
pub mod migration;
pub mod progress;
pub mod schedule;
