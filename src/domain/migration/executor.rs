//! Migration executor - turns a plan and a strategy into the new record set.
//!
//! The result is always the complete partition of the new period or an
//! error; old and new buckets are never mixed.
//!
//! Migrated records start with every signature and upload flag incomplete.
//! A percentage assigned by the strategy is kept as an override until the
//! next signature or upload edit recomputes it.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::foundation::{DomainError, ErrorCode, Percentage};
use crate::domain::progress::{ProgressRecord, Signature};
use crate::domain::schedule::{partition, Bucket, Period, SubPeriod};

use super::analyzer::{contained_sources, contained_targets, index_records};
use super::notes::merge_notes;
use super::{
    HalfMonthMode, MergeCandidate, MergeMode, MigrationAnalyzer, MigrationDirection,
    MigrationPlan, MigrationStrategy, SplitCandidate, SplitMode,
};

/// Values destined for one new bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    percentage: Percentage,
    notes: Option<String>,
}

impl Assignment {
    fn new(percentage: Percentage, notes: Option<String>) -> Self {
        Self { percentage, notes }
    }
}

/// Executor for period changes.
pub struct MigrationExecutor;

impl MigrationExecutor {
    /// Produces the record set for `partition(new)`.
    ///
    /// `plan` must be the analysis of exactly these inputs; `strategy` must
    /// cover every candidate in it.
    ///
    /// # Errors
    ///
    /// - `NoOpMigration` when both periods are the same
    /// - `PlanMismatch` when `plan` was built for other periods or other data
    /// - `PartitionMismatch` when a record is not a bucket of `old` or repeats
    /// - `IncompleteStrategy` when a candidate has no selection
    /// - `ValidationFailed` when a selection names buckets outside its candidate
    pub fn execute(
        old: Period,
        new: Period,
        records: &[ProgressRecord],
        signatures: &[Signature],
        plan: &MigrationPlan,
        strategy: &MigrationStrategy,
    ) -> Result<Vec<ProgressRecord>, DomainError> {
        let direction = MigrationAnalyzer::direction(old, new)?;
        if plan.old_period != old || plan.new_period != new {
            return Err(DomainError::new(
                ErrorCode::PlanMismatch,
                format!(
                    "Plan covers {} -> {}, migration requested {} -> {}",
                    plan.old_period, plan.new_period, old, new
                ),
            ));
        }
        if MigrationAnalyzer::analyze(old, new, records)? != *plan {
            return Err(DomainError::new(
                ErrorCode::PlanMismatch,
                "Plan no longer matches the stored records",
            ));
        }
        validate_strategy(plan, strategy)?;

        debug!(
            old = %old,
            new = %new,
            direction = ?direction,
            merges = plan.merge_plan.len(),
            splits = plan.split_plan.len(),
            "Executing period migration"
        );

        let index = index_records(old, records)?;
        let mut assigned: BTreeMap<Bucket, Assignment> = BTreeMap::new();

        match direction {
            MigrationDirection::Merge => {
                for candidate in &plan.merge_plan {
                    if let Some(selection) = strategy.merge_for(candidate.target_bucket) {
                        let percentage = merge_percentage(candidate, &selection.mode);
                        let notes = merge_notes(&candidate.sources, &selection.retained_notes);
                        assigned.insert(candidate.target_bucket, Assignment::new(percentage, notes));
                    }
                }
            }
            MigrationDirection::Split | MigrationDirection::HalfMonthExpansion => {
                for (source, record) in &index {
                    if !record.is_non_trivial() {
                        continue;
                    }
                    if let [only] = contained_targets(*source, old, new).as_slice() {
                        assigned.insert(
                            *only,
                            Assignment::new(record.percentage(), record.notes().map(str::to_owned)),
                        );
                    }
                }
                for candidate in &plan.split_plan {
                    let spread = if direction == MigrationDirection::HalfMonthExpansion {
                        strategy.half_month().map(|mode| expand_half_month(candidate, mode))
                    } else {
                        strategy.split_for(candidate.source_bucket).map(|mode| split(candidate, mode))
                    };
                    assigned.extend(spread.unwrap_or_default());
                }
            }
        }

        report_dropped(old, new, direction, &index);

        Ok(partition(new)
            .into_iter()
            .map(|bucket| match assigned.remove(&bucket) {
                Some(a) => ProgressRecord::migrated(bucket, signatures, a.percentage, a.notes),
                None => ProgressRecord::empty(bucket, signatures),
            })
            .collect())
    }
}

fn validate_strategy(plan: &MigrationPlan, strategy: &MigrationStrategy) -> Result<(), DomainError> {
    for candidate in &plan.merge_plan {
        let selection = strategy.merge_for(candidate.target_bucket).ok_or_else(|| {
            incomplete(format!("No merge mode chosen for bucket {}", candidate.target_bucket))
                .with_detail("bucket", candidate.target_bucket.to_string())
        })?;
        if let Some(stray) = selection
            .retained_notes
            .iter()
            .find(|b| !candidate.sources.iter().any(|s| s.bucket == **b))
        {
            return Err(DomainError::validation(
                "retained_notes",
                format!(
                    "Bucket {} is not a source of merge target {}",
                    stray, candidate.target_bucket
                ),
            ));
        }
    }

    if plan.direction == MigrationDirection::HalfMonthExpansion {
        if !plan.split_plan.is_empty() && strategy.half_month().is_none() {
            return Err(incomplete("No half-month mode chosen".to_string()));
        }
        return Ok(());
    }

    for candidate in &plan.split_plan {
        let mode = strategy.split_for(candidate.source_bucket).ok_or_else(|| {
            incomplete(format!("No split mode chosen for bucket {}", candidate.source_bucket))
                .with_detail("bucket", candidate.source_bucket.to_string())
        })?;
        if let SplitMode::Manual(values) = mode {
            if let Some(stray) = values
                .keys()
                .find(|b| !candidate.target_buckets.contains(*b))
            {
                return Err(DomainError::validation(
                    "manual_values",
                    format!(
                        "Bucket {} is not a target of split source {}",
                        stray, candidate.source_bucket
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn incomplete(message: String) -> DomainError {
    DomainError::new(ErrorCode::IncompleteStrategy, message)
}

fn merge_percentage(candidate: &MergeCandidate, mode: &MergeMode) -> Percentage {
    match mode {
        MergeMode::Highest => candidate.highest_percentage,
        MergeMode::Last => candidate.last_percentage.unwrap_or(Percentage::ZERO),
        MergeMode::Manual(value) => *value,
    }
}

fn split(candidate: &SplitCandidate, mode: &SplitMode) -> BTreeMap<Bucket, Assignment> {
    let copy = || Assignment::new(candidate.source_percentage, candidate.source_notes.clone());
    match mode {
        SplitMode::Duplicate => candidate
            .target_buckets
            .iter()
            .map(|target| (*target, copy()))
            .collect(),
        SplitMode::Last => candidate
            .closing_target()
            .map(|target| (target, copy()))
            .into_iter()
            .collect(),
        SplitMode::Manual(values) => candidate
            .target_buckets
            .iter()
            .map(|target| {
                let percentage = values
                    .get(target)
                    .copied()
                    .unwrap_or(candidate.source_percentage);
                (*target, Assignment::new(percentage, candidate.source_notes.clone()))
            })
            .collect(),
    }
}

fn expand_half_month(candidate: &SplitCandidate, mode: HalfMonthMode) -> BTreeMap<Bucket, Assignment> {
    let copy = || Assignment::new(candidate.source_percentage, candidate.source_notes.clone());
    candidate
        .target_buckets
        .iter()
        .filter(|target| match mode {
            HalfMonthMode::Duplicate => true,
            HalfMonthMode::Empty => target.sub_period() == Some(SubPeriod::First),
        })
        .map(|target| (*target, copy()))
        .collect()
}

/// Logs non-trivial old buckets that no new bucket fully contains (or is
/// contained by). Happens only between periods whose boundaries do not nest.
fn report_dropped(
    old: Period,
    new: Period,
    direction: MigrationDirection,
    index: &BTreeMap<Bucket, &ProgressRecord>,
) {
    let carried: Vec<Bucket> = match direction {
        MigrationDirection::Merge => partition(new)
            .into_iter()
            .flat_map(|target| contained_sources(target, old, new))
            .collect(),
        _ => index
            .keys()
            .filter(|source| !contained_targets(**source, old, new).is_empty())
            .copied()
            .collect(),
    };

    for (bucket, record) in index {
        if record.is_non_trivial() && !carried.contains(bucket) {
            warn!(
                bucket = %bucket,
                old = %old,
                new = %new,
                percentage = record.percentage().value(),
                "Bucket straddles the new partition; its data is not carried over"
            );
        }
    }
}
