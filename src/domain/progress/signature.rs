//! Signature slots and their per-bucket completion state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SignatureId, Timestamp, ValidationError};

/// A party whose signature each reporting bucket collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub id: SignatureId,
    pub name: String,
    pub role: String,
}

impl Signature {
    /// Creates a signature slot with a fresh identifier.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("signature.name"));
        }
        Ok(Self {
            id: SignatureId::new(),
            name,
            role: role.into(),
        })
    }
}

/// Whether one signature has been collected for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureStatus {
    pub signature_id: SignatureId,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl SignatureStatus {
    /// Not yet signed.
    pub fn pending(signature_id: SignatureId) -> Self {
        Self {
            signature_id,
            completed: false,
            completed_at: None,
        }
    }

    /// Incomplete statuses for every signature, in contract order.
    pub fn all_pending(signatures: &[Signature]) -> Vec<Self> {
        signatures.iter().map(|s| Self::pending(s.id)).collect()
    }
}
