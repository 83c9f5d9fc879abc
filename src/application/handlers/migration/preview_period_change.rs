//! PreviewPeriodChangeHandler - Query handler producing a migration plan.
//!
//! Pure read: nothing is persisted or published.

use std::sync::Arc;

use crate::domain::foundation::ContractId;
use crate::domain::migration::{MigrationAnalyzer, MigrationError, MigrationPlan};
use crate::domain::schedule::Period;
use crate::ports::ProgressRepository;

/// Query for the impact of switching a contract year to another period.
#[derive(Debug, Clone)]
pub struct PreviewPeriodChangeQuery {
    pub contract_id: ContractId,
    pub year: i32,
    pub new_period: Period,
}

/// Handler for period change previews.
pub struct PreviewPeriodChangeHandler {
    repository: Arc<dyn ProgressRepository>,
}

impl PreviewPeriodChangeHandler {
    pub fn new(repository: Arc<dyn ProgressRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: PreviewPeriodChangeQuery,
    ) -> Result<MigrationPlan, MigrationError> {
        let contract = self
            .repository
            .find_contract(&query.contract_id)
            .await?
            .ok_or(MigrationError::ContractNotFound(query.contract_id))?;

        if contract.period() == query.new_period {
            return Err(MigrationError::NoOp(query.new_period));
        }

        let records = self
            .repository
            .find_year(&query.contract_id, query.year)
            .await?
            .unwrap_or_else(|| contract.open_year());

        Ok(MigrationAnalyzer::analyze(
            contract.period(),
            query.new_period,
            &records,
        )?)
    }
}
