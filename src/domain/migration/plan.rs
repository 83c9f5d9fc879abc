//! Dry-run migration plan produced by the analyzer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;
use crate::domain::progress::ProgressRecord;
use crate::domain::schedule::{Bucket, Period};

/// How old buckets relate to new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationDirection {
    /// New buckets are longer; several old buckets fold into one.
    Merge,
    /// New buckets are shorter; one old bucket spreads over several.
    Split,
    /// Whole-month buckets become half-month buckets.
    HalfMonthExpansion,
}

/// Snapshot of an old bucket's values offered to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBucket {
    pub bucket: Bucket,
    pub percentage: Percentage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SourceBucket {
    pub(crate) fn from_record(record: &ProgressRecord) -> Self {
        Self {
            bucket: record.bucket(),
            percentage: record.percentage(),
            notes: record.notes().map(str::to_owned),
        }
    }
}

/// A new bucket that receives data from more than zero non-trivial old buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCandidate {
    pub target_bucket: Bucket,
    /// Contributing old buckets, chronological.
    pub sources: Vec<SourceBucket>,
    pub highest_percentage: Percentage,
    /// Percentage of the latest source ending in the target's end month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_percentage: Option<Percentage>,
}

/// An old bucket whose data must be spread over several new buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCandidate {
    pub source_bucket: Bucket,
    pub source_percentage: Percentage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_notes: Option<String>,
    /// New buckets fully inside the source, chronological. Always two or more.
    pub target_buckets: Vec<Bucket>,
}

impl SplitCandidate {
    /// The target sharing the source's end month (the closing slot).
    pub fn closing_target(&self) -> Option<Bucket> {
        self.target_buckets
            .iter()
            .rev()
            .find(|b| b.end_month() == self.source_bucket.end_month())
            .copied()
    }
}

/// Impact analysis of a period change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub old_period: Period,
    pub new_period: Period,
    pub direction: MigrationDirection,
    pub merge_plan: Vec<MergeCandidate>,
    pub split_plan: Vec<SplitCandidate>,
}

impl MigrationPlan {
    /// False when every new bucket can be filled without asking the caller.
    pub fn requires_configuration(&self) -> bool {
        !self.merge_plan.is_empty() || !self.split_plan.is_empty()
    }

    pub fn merge_candidate(&self, target: Bucket) -> Option<&MergeCandidate> {
        self.merge_plan.iter().find(|c| c.target_bucket == target)
    }

    pub fn split_candidate(&self, source: Bucket) -> Option<&SplitCandidate> {
        self.split_plan.iter().find(|c| c.source_bucket == source)
    }
}
