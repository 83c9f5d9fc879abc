//! Migration domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, ContractId, EventId, Timestamp};
use crate::domain::schedule::Period;

/// Published once a period change has been committed for every stored year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodMigrated {
    pub event_id: EventId,
    pub contract_id: ContractId,
    pub old_period: Period,
    pub new_period: Period,
    pub years: Vec<i32>,
    /// Merge candidates resolved across all years.
    pub merged_buckets: usize,
    /// Split candidates resolved across all years.
    pub split_buckets: usize,
    pub migrated_at: Timestamp,
}

domain_event!(
    PeriodMigrated,
    event_type = "period.migrated.v1",
    aggregate_id = contract_id,
    aggregate_type = "Contract",
    occurred_at = migrated_at,
    event_id = event_id
);
