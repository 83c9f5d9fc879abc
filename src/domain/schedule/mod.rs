//! Schedule module - reporting periods and the buckets they cut a year into.
//!
//! - `Period` - fixed-domain reporting granularity (half-month or N months)
//! - `Bucket` - one reporting slot, identified by end month and sub-period
//! - `partition` / `relevant_months` - the single source of bucket boundaries

mod bucket;
mod partition;
mod period;

pub use bucket::{month_abbrev, Bucket, SlotRange, SubPeriod};
pub use partition::{is_member, partition, relevant_months};
pub use period::{MonthSpan, Period};
