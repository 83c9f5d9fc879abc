//! ChangePeriodHandler - Command handler applying a period change.
//!
//! The configured year is migrated with the caller's strategy against the
//! plan the caller previewed. Every other stored year is migrated with the
//! configured defaults. The contract and all years are committed together,
//! guarded by the contract version read at the start; on any failure nothing
//! is written and nothing is published. Writes by other handlers that land
//! in between make the commit fail with a conflict instead of being lost.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::config::MigrationDefaults;
use crate::application::handlers::publish_committed;
use crate::domain::foundation::{CommandMetadata, ContractId, EventId, Timestamp};
use crate::domain::migration::{
    MigrationAnalyzer, MigrationError, MigrationExecutor, MigrationPlan, MigrationStrategy,
    PeriodMigrated,
};
use crate::domain::progress::{Contract, ProgressRecord};
use crate::domain::schedule::Period;
use crate::ports::{EventPublisher, ProgressRepository, YearRecords};

/// Command to switch a contract to another period.
#[derive(Debug, Clone)]
pub struct ChangePeriodCommand {
    pub contract_id: ContractId,
    /// Year the strategy was configured for.
    pub year: i32,
    pub new_period: Period,
    /// The preview the strategy answers; rejected if the data moved since.
    pub plan: MigrationPlan,
    pub strategy: MigrationStrategy,
}

/// Result of a committed period change.
#[derive(Debug, Clone)]
pub struct ChangePeriodResult {
    pub contract: Contract,
    /// New records of the configured year.
    pub records: Vec<ProgressRecord>,
    pub event: PeriodMigrated,
}

/// Handler for period changes.
pub struct ChangePeriodHandler {
    repository: Arc<dyn ProgressRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    defaults: MigrationDefaults,
    in_flight: Mutex<HashSet<ContractId>>,
}

/// Marks a contract as migrating until dropped.
struct InFlight<'a> {
    contracts: &'a Mutex<HashSet<ContractId>>,
    id: ContractId,
}

impl<'a> InFlight<'a> {
    fn acquire(
        contracts: &'a Mutex<HashSet<ContractId>>,
        id: ContractId,
    ) -> Result<Self, MigrationError> {
        let mut set = contracts
            .lock()
            .map_err(|_| MigrationError::Infrastructure("migration registry poisoned".to_string()))?;
        if !set.insert(id) {
            return Err(MigrationError::InProgress(id));
        }
        Ok(Self { contracts, id })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut set = match self.contracts.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.remove(&self.id);
    }
}

impl ChangePeriodHandler {
    pub fn new(
        repository: Arc<dyn ProgressRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        defaults: MigrationDefaults,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            defaults,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub async fn handle(
        &self,
        cmd: ChangePeriodCommand,
        metadata: CommandMetadata,
    ) -> Result<ChangePeriodResult, MigrationError> {
        let _guard = InFlight::acquire(&self.in_flight, cmd.contract_id)?;

        let mut contract = self
            .repository
            .find_contract(&cmd.contract_id)
            .await?
            .ok_or(MigrationError::ContractNotFound(cmd.contract_id))?;
        let read_version = contract.version();
        let old_period = contract.period();
        if old_period == cmd.new_period {
            return Err(MigrationError::NoOp(cmd.new_period));
        }

        let mut years = self.repository.find_all_years(&cmd.contract_id).await?;
        years
            .entry(cmd.year)
            .or_insert_with(|| contract.open_year());

        let mut migrated = YearRecords::new();
        let mut merged_buckets = 0;
        let mut split_buckets = 0;
        for (year, records) in &years {
            contract.verify_year(records)?;
            let (plan, strategy) = if *year == cmd.year {
                (cmd.plan.clone(), cmd.strategy.clone())
            } else {
                let plan = MigrationAnalyzer::analyze(old_period, cmd.new_period, records)?;
                let strategy = self.defaults.strategy_for(&plan);
                (plan, strategy)
            };

            let new_records = MigrationExecutor::execute(
                old_period,
                cmd.new_period,
                records,
                contract.signatures(),
                &plan,
                &strategy,
            )?;
            debug!(
                contract_id = %contract.id(),
                year,
                merges = plan.merge_plan.len(),
                splits = plan.split_plan.len(),
                "Year migrated"
            );
            merged_buckets += plan.merge_plan.len();
            split_buckets += plan.split_plan.len();
            migrated.insert(*year, new_records);
        }

        contract.change_period(cmd.new_period)?;
        self.repository
            .save_contract_years(&contract, &migrated, Some(read_version))
            .await?;

        let event = PeriodMigrated {
            event_id: EventId::new(),
            contract_id: contract.id(),
            old_period,
            new_period: cmd.new_period,
            years: migrated.keys().copied().collect(),
            merged_buckets,
            split_buckets,
            migrated_at: Timestamp::now(),
        };
        publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;

        info!(
            contract_id = %contract.id(),
            old_period = %old_period,
            new_period = %cmd.new_period,
            years = migrated.len(),
            "Period changed"
        );

        let records = migrated.remove(&cmd.year).unwrap_or_default();
        Ok(ChangePeriodResult {
            contract,
            records,
            event,
        })
    }
}
