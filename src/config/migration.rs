//! Period migration defaults

use serde::Deserialize;

use crate::domain::migration::{
    AutoMergeMode, AutoSplitMode, HalfMonthMode, MigrationPlan, MigrationStrategy,
};

/// Modes applied to stored years the caller did not configure explicitly.
///
/// A period change is configured for one year; every other stored year of
/// the contract is migrated with these rules in the same commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MigrationDefaults {
    /// Rule for merge targets (`highest` or `last`)
    #[serde(default = "default_merge")]
    pub merge: AutoMergeMode,

    /// Rule for split sources (`duplicate` or `last`)
    #[serde(default = "default_split")]
    pub split: AutoSplitMode,

    /// Rule for month to half-month expansion (`duplicate` or `empty`)
    #[serde(default = "default_half_month")]
    pub half_month: HalfMonthMode,
}

impl Default for MigrationDefaults {
    fn default() -> Self {
        Self {
            merge: default_merge(),
            split: default_split(),
            half_month: default_half_month(),
        }
    }
}

impl MigrationDefaults {
    /// Strategy covering every candidate of `plan`, all notes retained.
    pub fn strategy_for(&self, plan: &MigrationPlan) -> MigrationStrategy {
        MigrationStrategy::uniform(plan, self.merge, self.split, self.half_month)
    }
}

fn default_merge() -> AutoMergeMode {
    AutoMergeMode::Highest
}

fn default_split() -> AutoSplitMode {
    AutoSplitMode::Duplicate
}

fn default_half_month() -> HalfMonthMode {
    HalfMonthMode::Duplicate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_defaults() {
        let defaults = MigrationDefaults::default();
        assert_eq!(defaults.merge, AutoMergeMode::Highest);
        assert_eq!(defaults.split, AutoSplitMode::Duplicate);
        assert_eq!(defaults.half_month, HalfMonthMode::Duplicate);
    }

    #[test]
    fn test_migration_defaults_deserialization() {
        let json = r#"{ "merge": "last", "half_month": "empty" }"#;
        let defaults: MigrationDefaults = serde_json::from_str(json).unwrap();
        assert_eq!(defaults.merge, AutoMergeMode::Last);
        assert_eq!(defaults.split, AutoSplitMode::Duplicate);
        assert_eq!(defaults.half_month, HalfMonthMode::Empty);
    }
}
