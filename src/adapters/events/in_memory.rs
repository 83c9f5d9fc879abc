//! In-memory event bus.
//!
//! Captures every published envelope in order. Used by the test suites and
//! by embedders that only need to observe events in-process.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
///
/// assert_eq!(bus.event_count().await, 1);
/// assert!(bus.has_event("period.migrated.v1").await);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all published events.
    pub async fn published_events(&self) -> Vec<EventEnvelope> {
        self.published.read().await.clone()
    }

    /// Returns events of a specific type.
    pub async fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published
            .read()
            .await
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub async fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published
            .read()
            .await
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    /// Clears all published events.
    pub async fn clear(&self) {
        self.published.write().await.clear();
    }

    /// Returns count of published events.
    pub async fn event_count(&self) -> usize {
        self.published.read().await.len()
    }

    /// Checks if a specific event type was published.
    pub async fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .await
            .iter()
            .any(|e| e.event_type == event_type)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        debug!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            "Event published"
        );
        self.published.write().await.push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
