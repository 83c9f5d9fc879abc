//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_order_by_instant() {
        let earlier: Timestamp = serde_json::from_str("\"2024-05-15T10:30:00Z\"").unwrap();
        assert!(earlier < Timestamp::now());
    }

    #[test]
    fn timestamp_serializes_to_rfc3339() {
        let ts: Timestamp = serde_json::from_str("\"2024-05-15T10:30:00Z\"").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-05-15T10:30:00"));
        let restored: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ts);
    }
}
