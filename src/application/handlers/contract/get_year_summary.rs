//! GetYearSummaryHandler - Query handler for per-month progress of a year.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{ContractId, Percentage};
use crate::domain::progress::{ContractError, ProgressRecord};
use crate::domain::schedule::{relevant_months, Period};
use crate::ports::ProgressRepository;

/// Query for the progress summary of one contract year.
#[derive(Debug, Clone)]
pub struct GetYearSummaryQuery {
    pub contract_id: ContractId,
    pub year: i32,
}

/// Progress of the buckets closing in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthProgress {
    pub month: u8,
    pub average: Percentage,
    pub buckets: usize,
}

/// Progress summary of one contract year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub contract_id: ContractId,
    pub year: i32,
    pub period: Period,
    /// One entry per relevant month of the period, ascending.
    pub months: Vec<MonthProgress>,
    pub overall: Percentage,
}

/// Handler for year summaries.
pub struct GetYearSummaryHandler {
    repository: Arc<dyn ProgressRepository>,
}

impl GetYearSummaryHandler {
    pub fn new(repository: Arc<dyn ProgressRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetYearSummaryQuery) -> Result<YearSummary, ContractError> {
        let contract = self
            .repository
            .find_contract(&query.contract_id)
            .await?
            .ok_or(ContractError::NotFound(query.contract_id))?;

        let records = self
            .repository
            .find_year(&query.contract_id, query.year)
            .await?
            .unwrap_or_else(|| contract.open_year());

        let months = relevant_months(contract.period())
            .into_iter()
            .map(|month| {
                let closing: Vec<&ProgressRecord> = records
                    .iter()
                    .filter(|r| r.bucket().end_month() == month)
                    .collect();
                MonthProgress {
                    month,
                    average: average(&closing),
                    buckets: closing.len(),
                }
            })
            .collect();

        Ok(YearSummary {
            contract_id: contract.id(),
            year: query.year,
            period: contract.period(),
            months,
            overall: average(&records.iter().collect::<Vec<_>>()),
        })
    }
}

/// Mean percentage, rounded half up. Zero for no records.
fn average(records: &[&ProgressRecord]) -> Percentage {
    let sum: usize = records
        .iter()
        .map(|r| usize::from(r.percentage().value()))
        .sum();
    Percentage::from_ratio(sum, records.len() * 100)
}
