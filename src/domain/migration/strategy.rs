//! Caller-selected strategies for filling new buckets.
//!
//! Each candidate of a [`MigrationPlan`] gets its own selection. Manual modes
//! carry their values, so a manual choice without a value cannot be built.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;
use crate::domain::schedule::Bucket;

use super::MigrationPlan;

/// Percentage rule for one merge target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeMode {
    /// The highest source percentage.
    Highest,
    /// The source ending in the target's end month; zero if none does.
    Last,
    /// A caller-supplied value.
    Manual(Percentage),
}

/// Merge choice for one target: percentage rule plus the notes to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSelection {
    pub mode: MergeMode,
    /// Source buckets whose notes survive; all other notes are dropped.
    pub retained_notes: BTreeSet<Bucket>,
}

impl MergeSelection {
    pub fn new(mode: MergeMode) -> Self {
        Self {
            mode,
            retained_notes: BTreeSet::new(),
        }
    }

    pub fn retaining(mut self, buckets: impl IntoIterator<Item = Bucket>) -> Self {
        self.retained_notes.extend(buckets);
        self
    }
}

/// Percentage rule for one split source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMode {
    /// Every target copies the source.
    Duplicate,
    /// Only the target closing the source range copies it.
    Last,
    /// Per-target values; targets left out copy the source percentage.
    Manual(BTreeMap<Bucket, Percentage>),
}

/// How whole-month data lands in half-month buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfMonthMode {
    /// Both halves copy the month.
    Duplicate,
    /// The first half copies the month, the second starts empty.
    Empty,
}

/// Merge rules that need no per-candidate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoMergeMode {
    Highest,
    Last,
}

impl From<AutoMergeMode> for MergeMode {
    fn from(mode: AutoMergeMode) -> Self {
        match mode {
            AutoMergeMode::Highest => MergeMode::Highest,
            AutoMergeMode::Last => MergeMode::Last,
        }
    }
}

/// Split rules that need no per-candidate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSplitMode {
    Duplicate,
    Last,
}

impl From<AutoSplitMode> for SplitMode {
    fn from(mode: AutoSplitMode) -> Self {
        match mode {
            AutoSplitMode::Duplicate => SplitMode::Duplicate,
            AutoSplitMode::Last => SplitMode::Last,
        }
    }
}

/// Full set of choices for executing one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStrategy {
    merges: BTreeMap<Bucket, MergeSelection>,
    splits: BTreeMap<Bucket, SplitMode>,
    half_month: Option<HalfMonthMode>,
}

impl MigrationStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the same non-interactive rules to every candidate of `plan`,
    /// keeping all source notes.
    pub fn uniform(
        plan: &MigrationPlan,
        merge: AutoMergeMode,
        split: AutoSplitMode,
        half_month: HalfMonthMode,
    ) -> Self {
        let mut strategy = Self::new().with_half_month(half_month);
        for candidate in &plan.merge_plan {
            let selection = MergeSelection::new(merge.into())
                .retaining(candidate.sources.iter().map(|s| s.bucket));
            strategy = strategy.with_merge(candidate.target_bucket, selection);
        }
        for candidate in &plan.split_plan {
            strategy = strategy.with_split(candidate.source_bucket, split.into());
        }
        strategy
    }

    pub fn with_merge(mut self, target: Bucket, selection: MergeSelection) -> Self {
        self.merges.insert(target, selection);
        self
    }

    pub fn with_split(mut self, source: Bucket, mode: SplitMode) -> Self {
        self.splits.insert(source, mode);
        self
    }

    pub fn with_half_month(mut self, mode: HalfMonthMode) -> Self {
        self.half_month = Some(mode);
        self
    }

    pub fn merge_for(&self, target: Bucket) -> Option<&MergeSelection> {
        self.merges.get(&target)
    }

    pub fn split_for(&self, source: Bucket) -> Option<&SplitMode> {
        self.splits.get(&source)
    }

    pub fn half_month(&self) -> Option<HalfMonthMode> {
        self.half_month
    }
}
