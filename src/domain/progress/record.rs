//! ProgressRecord - completion state of one bucket for one contract year.
//!
//! # Invariants
//!
//! - `signature_statuses` has one entry per contract signature, in order
//! - while `percentage_source` is `Derived`, the percentage equals
//!   `round(100 * (signed + uploaded) / (signatures + 1))`
//! - a migration may assign the percentage directly; the record is then
//!   marked `MigrationOverride` until the next signature or upload edit

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, Percentage, SignatureId, Timestamp,
};
use crate::domain::schedule::Bucket;

use super::{Signature, SignatureStatus};

/// Where a record's percentage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PercentageSource {
    /// Computed from signature and upload state.
    #[default]
    Derived,
    /// Assigned by a period migration strategy.
    MigrationOverride,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    bucket: Bucket,
    percentage: Percentage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    upload_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upload_link: Option<String>,
    signature_statuses: Vec<SignatureStatus>,
    #[serde(default)]
    percentage_source: PercentageSource,
}

impl ProgressRecord {
    /// A fresh record with nothing signed or uploaded.
    pub fn empty(bucket: Bucket, signatures: &[Signature]) -> Self {
        Self {
            bucket,
            percentage: Percentage::ZERO,
            notes: None,
            upload_completed: false,
            upload_link: None,
            signature_statuses: SignatureStatus::all_pending(signatures),
            percentage_source: PercentageSource::Derived,
        }
    }

    /// A record produced by a migration strategy.
    ///
    /// Signature and upload flags start incomplete. The percentage is kept as
    /// given; the record is marked as an override unless that value happens to
    /// agree with the derivation (which for an untouched record means zero).
    pub fn migrated(
        bucket: Bucket,
        signatures: &[Signature],
        percentage: Percentage,
        notes: Option<String>,
    ) -> Self {
        let mut record = Self::empty(bucket, signatures);
        record.percentage = percentage;
        record.notes = normalize_notes(notes);
        if record.percentage != record.derived_percentage() {
            record.percentage_source = PercentageSource::MigrationOverride;
        }
        record
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn upload_completed(&self) -> bool {
        self.upload_completed
    }

    pub fn upload_link(&self) -> Option<&str> {
        self.upload_link.as_deref()
    }

    pub fn signature_statuses(&self) -> &[SignatureStatus] {
        &self.signature_statuses
    }

    pub fn percentage_source(&self) -> PercentageSource {
        self.percentage_source
    }

    pub fn completed_signatures(&self) -> usize {
        self.signature_statuses.iter().filter(|s| s.completed).count()
    }

    /// The percentage implied by signature and upload state.
    pub fn derived_percentage(&self) -> Percentage {
        let done = self.completed_signatures() + usize::from(self.upload_completed);
        Percentage::from_ratio(done, self.signature_statuses.len() + 1)
    }

    /// True when the stored percentage honours the derivation rule.
    pub fn is_consistent(&self) -> bool {
        self.percentage_source == PercentageSource::MigrationOverride
            || self.percentage == self.derived_percentage()
    }

    /// A record with progress or notes worth carrying through a migration.
    pub fn is_non_trivial(&self) -> bool {
        self.percentage.is_positive() || self.notes.is_some()
    }

    /// Marks one signature as signed or unsigned and recomputes the percentage.
    ///
    /// # Errors
    ///
    /// - `SignatureNotFound` if the record has no status for `signature_id`
    pub fn set_signature(
        &mut self,
        signature_id: SignatureId,
        completed: bool,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        let status = self
            .signature_statuses
            .iter_mut()
            .find(|s| s.signature_id == signature_id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SignatureNotFound,
                    format!("Signature {} is not tracked for bucket {}", signature_id, self.bucket),
                )
            })?;

        status.completed = completed;
        status.completed_at = if completed { Some(at) } else { None };
        self.recompute();
        Ok(())
    }

    /// Records the document upload state and recomputes the percentage.
    pub fn set_upload(&mut self, completed: bool, link: Option<String>) {
        self.upload_completed = completed;
        self.upload_link = link.filter(|l| !l.trim().is_empty());
        self.recompute();
    }

    /// Replaces the free-text notes. Blank notes are stored as absent.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = normalize_notes(notes);
    }

    /// Appends an incomplete status for a newly added signature.
    ///
    /// The percentage is recomputed because the denominator grows; an
    /// override from a migration is kept as-is.
    pub fn extend_signature(&mut self, signature_id: SignatureId) {
        if self
            .signature_statuses
            .iter()
            .any(|s| s.signature_id == signature_id)
        {
            return;
        }
        self.signature_statuses.push(SignatureStatus::pending(signature_id));
        if self.percentage_source == PercentageSource::Derived {
            self.percentage = self.derived_percentage();
        }
    }

    fn recompute(&mut self) {
        self.percentage = self.derived_percentage();
        self.percentage_source = PercentageSource::Derived;
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.trim().is_empty())
}
