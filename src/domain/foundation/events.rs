//! Event infrastructure for domain event publishing.
//!
//! - `EventId` - Unique identifier for events (deduplication)
//! - `EventMetadata` - Correlation context
//! - `EventEnvelope` - Transport wrapper for domain events
//! - `DomainEvent` - Trait that all domain events implement
//! - `domain_event!` - Macro to simplify DomainEvent implementations

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::{DomainError, ErrorCode, Timestamp};

/// Trait that all domain events must implement.
pub trait DomainEvent: Send + Sync {
    /// Returns the event type string (e.g., "period.migrated.v1").
    fn event_type(&self) -> &'static str;

    /// Returns the ID of the aggregate that emitted this event.
    fn aggregate_id(&self) -> String;

    /// Returns the type of aggregate (e.g., "Contract").
    fn aggregate_type(&self) -> &'static str;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> Timestamp;

    /// Returns the unique ID for this event instance.
    fn event_id(&self) -> EventId;
}

/// Implements [`DomainEvent`] by naming the fields that carry each value.
///
/// ```ignore
/// domain_event!(
///     PeriodMigrated,
///     event_type = "period.migrated.v1",
///     aggregate_id = contract_id,
///     aggregate_type = "Contract",
///     occurred_at = migrated_at,
///     event_id = event_id
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event_name:ident,
        event_type = $event_type:expr,
        aggregate_id = $agg_id_field:ident,
        aggregate_type = $agg_type:expr,
        occurred_at = $occurred_field:ident,
        event_id = $event_id_field:ident
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event_name {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn aggregate_id(&self) -> String {
                self.$agg_id_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $agg_type
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.$event_id_field.clone()
            }
        }
    };
}

pub use crate::domain_event;

/// Unique identifier for events (used for deduplication).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation context attached to an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Transport envelope for domain events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub event_type: String,
    pub schema_version: u32,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,
    pub payload: JsonValue,
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    /// Wraps a domain event, serializing it as the payload.
    ///
    /// The schema version is taken from the `.vN` suffix of the event type
    /// and defaults to 1.
    pub fn from_event<T>(event: &T) -> Result<Self, DomainError>
    where
        T: DomainEvent + Serialize,
    {
        let event_type = event.event_type().to_string();
        let schema_version = Self::extract_version(&event_type);
        let payload = serde_json::to_value(event).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize {}: {}", event_type, e),
            )
        })?;

        Ok(Self {
            event_id: event.event_id(),
            event_type,
            schema_version,
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            payload,
            metadata: EventMetadata::default(),
        })
    }

    pub(crate) fn extract_version(event_type: &str) -> u32 {
        event_type
            .rsplit_once(".v")
            .and_then(|(_, version_str)| version_str.parse::<u32>().ok())
            .unwrap_or(1)
    }

    /// Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    /// Add user ID for audit.
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.user_id = Some(id.into());
        self
    }

    /// Deserialize payload to a specific event type.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct SampleEvent {
        event_id: EventId,
        contract_id: String,
        at: Timestamp,
    }

    domain_event!(
        SampleEvent,
        event_type = "sample.happened.v2",
        aggregate_id = contract_id,
        aggregate_type = "Contract",
        occurred_at = at,
        event_id = event_id
    );

    #[test]
    fn extract_version_reads_suffix() {
        assert_eq!(EventEnvelope::extract_version("period.migrated.v2"), 2);
        assert_eq!(EventEnvelope::extract_version("period.migrated.v10"), 10);
        assert_eq!(EventEnvelope::extract_version("legacy.event"), 1);
    }

    #[test]
    fn from_event_fills_envelope_fields() {
        let event = SampleEvent {
            event_id: EventId::from_string("evt-1"),
            contract_id: "contract-9".to_string(),
            at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .unwrap()
            .with_correlation_id("corr")
            .with_user_id("admin");

        assert_eq!(envelope.event_type, "sample.happened.v2");
        assert_eq!(envelope.schema_version, 2);
        assert_eq!(envelope.aggregate_id, "contract-9");
        assert_eq!(envelope.aggregate_type, "Contract");
        assert_eq!(envelope.metadata.correlation_id.as_deref(), Some("corr"));

        let restored: SampleEvent = envelope.payload_as().unwrap();
        assert_eq!(restored.event_id, event.event_id);
    }
}
