//! Period migration: analysis, strategies and execution.
//!
//! A period change runs in two steps. [`MigrationAnalyzer::analyze`] is a
//! pure dry run that lists every new bucket needing a decision.
//! [`MigrationExecutor::execute`] applies a [`MigrationStrategy`] covering
//! those decisions and returns the full record set for the new period.

mod analyzer;
mod errors;
mod events;
mod executor;
mod notes;
mod plan;
mod strategy;

pub use analyzer::MigrationAnalyzer;
pub use errors::MigrationError;
pub use events::PeriodMigrated;
pub use executor::MigrationExecutor;
pub use notes::merge_notes;
pub use plan::{MergeCandidate, MigrationDirection, MigrationPlan, SourceBucket, SplitCandidate};
pub use strategy::{
    AutoMergeMode, AutoSplitMode, HalfMonthMode, MergeMode, MergeSelection, MigrationStrategy,
    SplitMode,
};
