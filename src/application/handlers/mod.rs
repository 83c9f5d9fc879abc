//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod contract;
pub mod migration;

use serde::Serialize;
use tracing::warn;

use crate::domain::foundation::{CommandMetadata, DomainEvent, EventEnvelope};
use crate::ports::EventPublisher;

pub use contract::{
    AddSignatureCommand, AddSignatureHandler, AddSignatureResult, CreateContractCommand,
    CreateContractHandler, CreateContractResult, GetYearSummaryHandler, GetYearSummaryQuery,
    MonthProgress, ProgressChange, SignatureInput, UpdateProgressCommand, UpdateProgressHandler,
    UpdateProgressResult, YearSummary,
};
pub use migration::{
    ChangePeriodCommand, ChangePeriodHandler, ChangePeriodResult, PreviewPeriodChangeHandler,
    PreviewPeriodChangeQuery,
};

/// Publishes the event of a write that is already committed.
///
/// The write stands whether or not publishing succeeds, so failures are
/// logged and never reported to the caller.
pub(crate) async fn publish_committed<E>(
    publisher: &dyn EventPublisher,
    event: &E,
    metadata: &CommandMetadata,
) where
    E: DomainEvent + Serialize,
{
    let envelope = match EventEnvelope::from_event(event) {
        Ok(envelope) => envelope
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string()),
        Err(err) => {
            warn!(event_type = event.event_type(), error = %err, "Failed to build event envelope");
            return;
        }
    };
    if let Err(err) = publisher.publish(envelope).await {
        warn!(
            event_type = event.event_type(),
            aggregate_id = %event.aggregate_id(),
            error = %err,
            "Event publish failed after commit"
        );
    }
}
