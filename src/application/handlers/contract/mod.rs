//! Contract and progress command and query handlers.

mod add_signature;
mod create_contract;
mod get_year_summary;
mod update_progress;

pub use add_signature::{AddSignatureCommand, AddSignatureHandler, AddSignatureResult};
pub use create_contract::{
    CreateContractCommand, CreateContractHandler, CreateContractResult, SignatureInput,
};
pub use get_year_summary::{GetYearSummaryHandler, GetYearSummaryQuery, MonthProgress, YearSummary};
pub use update_progress::{
    ProgressChange, UpdateProgressCommand, UpdateProgressHandler, UpdateProgressResult,
};
