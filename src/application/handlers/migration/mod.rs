//! Period change command and query handlers.

mod change_period;
mod preview_period_change;

pub use change_period::{ChangePeriodCommand, ChangePeriodHandler, ChangePeriodResult};
pub use preview_period_change::{PreviewPeriodChangeHandler, PreviewPeriodChangeQuery};
