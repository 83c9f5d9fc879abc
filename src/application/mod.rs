//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Contract handlers
    AddSignatureCommand, AddSignatureHandler, AddSignatureResult,
    CreateContractCommand, CreateContractHandler, CreateContractResult, SignatureInput,
    UpdateProgressCommand, UpdateProgressHandler, UpdateProgressResult, ProgressChange,
    GetYearSummaryHandler, GetYearSummaryQuery, MonthProgress, YearSummary,
    // Period change handlers
    ChangePeriodCommand, ChangePeriodHandler, ChangePeriodResult,
    PreviewPeriodChangeHandler, PreviewPeriodChangeQuery,
};
