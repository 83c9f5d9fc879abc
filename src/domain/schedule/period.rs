//! Reporting period (granularity) value object.
//!
//! On the wire a period is a bare number: `0.5` for half-month reporting or a
//! whole month count from the fixed domain `{1, 2, 3, 4, 6, 12}`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Whole month counts that evenly divide a year.
const SUPPORTED_MONTH_SPANS: [u8; 6] = [1, 2, 3, 4, 6, 12];

/// Number of months spanned by a whole-month period.
///
/// Only values that evenly divide twelve can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthSpan(u8);

impl MonthSpan {
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);
    pub const FOUR: Self = Self(4);
    pub const SIX: Self = Self(6);
    pub const TWELVE: Self = Self(12);

    /// Validates a month count against the fixed domain.
    pub fn new(months: u8) -> Result<Self, DomainError> {
        if SUPPORTED_MONTH_SPANS.contains(&months) {
            Ok(Self(months))
        } else {
            Err(invalid_period(months.to_string()))
        }
    }

    /// Returns the month count.
    pub fn get(&self) -> u8 {
        self.0
    }
}

/// How often a contract reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Two reporting slots per calendar month (days 1-20 and 21-30).
    HalfMonth,
    /// One reporting slot per `n` calendar months.
    Months(MonthSpan),
}

impl Period {
    pub const MONTHLY: Self = Period::Months(MonthSpan::ONE);
    pub const BIMONTHLY: Self = Period::Months(MonthSpan::TWO);
    pub const QUARTERLY: Self = Period::Months(MonthSpan::THREE);
    pub const FOUR_MONTHLY: Self = Period::Months(MonthSpan::FOUR);
    pub const SEMIANNUAL: Self = Period::Months(MonthSpan::SIX);
    pub const ANNUAL: Self = Period::Months(MonthSpan::TWELVE);

    /// Every supported period, finest first.
    pub const ALL: [Period; 7] = [
        Period::HalfMonth,
        Period::MONTHLY,
        Period::BIMONTHLY,
        Period::QUARTERLY,
        Period::FOUR_MONTHLY,
        Period::SEMIANNUAL,
        Period::ANNUAL,
    ];

    /// Parses the numeric wire value.
    ///
    /// # Errors
    ///
    /// - `InvalidPeriod` for anything outside `{0.5, 1, 2, 3, 4, 6, 12}`
    pub fn try_from_value(value: f64) -> Result<Self, DomainError> {
        if value == 0.5 {
            return Ok(Period::HalfMonth);
        }
        if value.fract() != 0.0 || !(1.0..=12.0).contains(&value) {
            return Err(invalid_period(value.to_string()));
        }
        MonthSpan::new(value as u8).map(Period::Months)
    }

    /// Returns the numeric wire value.
    pub fn value(&self) -> f64 {
        match self {
            Period::HalfMonth => 0.5,
            Period::Months(span) => f64::from(span.get()),
        }
    }

    /// Length of one bucket measured in half-month slots.
    pub fn half_month_slots(&self) -> u8 {
        match self {
            Period::HalfMonth => 1,
            Period::Months(span) => span.get() * 2,
        }
    }

    /// True when each bucket of `self` is longer than a bucket of `other`.
    pub fn is_coarser_than(&self, other: &Period) -> bool {
        self.half_month_slots() > other.half_month_slots()
    }

    pub fn is_half_month(&self) -> bool {
        matches!(self, Period::HalfMonth)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::HalfMonth => write!(f, "half-month"),
            Period::Months(span) if span.get() == 1 => write!(f, "1 month"),
            Period::Months(span) => write!(f, "{} months", span.get()),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Period::HalfMonth => serializer.serialize_f64(0.5),
            Period::Months(span) => serializer.serialize_u8(span.get()),
        }
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Period::try_from_value(raw).map_err(serde::de::Error::custom)
    }
}

fn invalid_period(raw: String) -> DomainError {
    DomainError::new(
        ErrorCode::InvalidPeriod,
        format!("Unsupported reporting period: {}", raw),
    )
    .with_detail("period", raw)
}
