//! Impact analyzer - dry run of a period change.
//!
//! Pure and stateless: the same inputs always yield the same plan, and
//! nothing is mutated, so callers may analyze as often as they like before
//! committing to a strategy.

use std::collections::BTreeMap;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::progress::ProgressRecord;
use crate::domain::schedule::{partition, Bucket, Period};

use super::{MergeCandidate, MigrationDirection, MigrationPlan, SourceBucket, SplitCandidate};

/// Analyzer for period changes.
pub struct MigrationAnalyzer;

impl MigrationAnalyzer {
    /// Classifies a period change.
    ///
    /// # Errors
    ///
    /// - `NoOpMigration` when both periods are the same
    pub fn direction(old: Period, new: Period) -> Result<MigrationDirection, DomainError> {
        if old == new {
            return Err(DomainError::new(
                ErrorCode::NoOpMigration,
                format!("Period is already {}", old),
            ));
        }
        if new.is_half_month() {
            return Ok(MigrationDirection::HalfMonthExpansion);
        }
        if new.is_coarser_than(&old) {
            Ok(MigrationDirection::Merge)
        } else {
            Ok(MigrationDirection::Split)
        }
    }

    /// Builds the merge and split candidates for moving `records` from `old`
    /// to `new`.
    ///
    /// # Errors
    ///
    /// - `NoOpMigration` when both periods are the same
    /// - `PartitionMismatch` when a record is not a bucket of `old` or repeats
    pub fn analyze(
        old: Period,
        new: Period,
        records: &[ProgressRecord],
    ) -> Result<MigrationPlan, DomainError> {
        let direction = Self::direction(old, new)?;
        let index = index_records(old, records)?;

        let (merge_plan, split_plan) = match direction {
            MigrationDirection::Merge => (merge_candidates(old, new, &index), Vec::new()),
            MigrationDirection::Split | MigrationDirection::HalfMonthExpansion => {
                (Vec::new(), split_candidates(old, new, &index))
            }
        };

        Ok(MigrationPlan {
            old_period: old,
            new_period: new,
            direction,
            merge_plan,
            split_plan,
        })
    }
}

/// Records keyed by bucket, checked against the old partition.
pub(crate) fn index_records(
    period: Period,
    records: &[ProgressRecord],
) -> Result<BTreeMap<Bucket, &ProgressRecord>, DomainError> {
    let mut index = BTreeMap::new();
    for record in records {
        let bucket = record.bucket();
        if !bucket.matches_period(period) {
            return Err(DomainError::new(
                ErrorCode::PartitionMismatch,
                format!("Bucket {} is not part of the {} partition", bucket, period),
            )
            .with_detail("bucket", bucket.to_string()));
        }
        if index.insert(bucket, record).is_some() {
            return Err(DomainError::new(
                ErrorCode::PartitionMismatch,
                format!("Bucket {} appears more than once", bucket),
            )
            .with_detail("bucket", bucket.to_string()));
        }
    }
    Ok(index)
}

/// New buckets fully contained in `source` (a bucket of `old`).
pub(crate) fn contained_targets(source: Bucket, old: Period, new: Period) -> Vec<Bucket> {
    let range = source.span(old);
    partition(new)
        .into_iter()
        .filter(|target| range.contains(&target.span(new)))
        .collect()
}

/// Old buckets fully contained in `target` (a bucket of `new`).
pub(crate) fn contained_sources(target: Bucket, old: Period, new: Period) -> Vec<Bucket> {
    let range = target.span(new);
    partition(old)
        .into_iter()
        .filter(|source| range.contains(&source.span(old)))
        .collect()
}

fn merge_candidates(
    old: Period,
    new: Period,
    index: &BTreeMap<Bucket, &ProgressRecord>,
) -> Vec<MergeCandidate> {
    partition(new)
        .into_iter()
        .filter_map(|target| {
            let sources: Vec<SourceBucket> = contained_sources(target, old, new)
                .into_iter()
                .filter_map(|bucket| index.get(&bucket))
                .filter(|record| record.is_non_trivial())
                .map(|record| SourceBucket::from_record(record))
                .collect();

            let highest_percentage = sources.iter().map(|s| s.percentage).max()?;
            let last_percentage = sources
                .iter()
                .rev()
                .find(|s| s.bucket.end_month() == target.end_month())
                .map(|s| s.percentage);

            Some(MergeCandidate {
                target_bucket: target,
                sources,
                highest_percentage,
                last_percentage,
            })
        })
        .collect()
}

fn split_candidates(
    old: Period,
    new: Period,
    index: &BTreeMap<Bucket, &ProgressRecord>,
) -> Vec<SplitCandidate> {
    partition(old)
        .into_iter()
        .filter_map(|source| {
            let record = index.get(&source).filter(|r| r.is_non_trivial())?;
            let target_buckets = contained_targets(source, old, new);
            if target_buckets.len() < 2 {
                return None;
            }
            Some(SplitCandidate {
                source_bucket: source,
                source_percentage: record.percentage(),
                source_notes: record.notes().map(str::to_owned),
                target_buckets,
            })
        })
        .collect()
}
