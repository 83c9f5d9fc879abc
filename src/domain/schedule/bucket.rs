//! Reporting bucket - one slot of a year's partition.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::Period;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter English abbreviation for a 1-based month.
pub fn month_abbrev(month: u8) -> &'static str {
    MONTH_ABBREVIATIONS
        .get(usize::from(month.saturating_sub(1)))
        .copied()
        .unwrap_or("???")
}

/// Half of a calendar month used by half-month reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubPeriod {
    /// Days 1-20.
    First,
    /// Days 21-30.
    Second,
}

impl SubPeriod {
    pub fn number(&self) -> u8 {
        match self {
            SubPeriod::First => 1,
            SubPeriod::Second => 2,
        }
    }

    pub fn from_number(n: u8) -> Result<Self, ValidationError> {
        match n {
            1 => Ok(SubPeriod::First),
            2 => Ok(SubPeriod::Second),
            other => Err(ValidationError::out_of_range("sub_period", 1, 2, i32::from(other))),
        }
    }

    /// Day range label, e.g. `1-20`.
    pub fn days(&self) -> &'static str {
        match self {
            SubPeriod::First => "1-20",
            SubPeriod::Second => "21-30",
        }
    }
}

impl Serialize for SubPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for SubPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        SubPeriod::from_number(raw).map_err(serde::de::Error::custom)
    }
}

/// Identifies one reporting slot within a year.
///
/// Ordering is chronological: by end month, then sub-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBucket")]
pub struct Bucket {
    end_month: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_period: Option<SubPeriod>,
}

#[derive(Deserialize)]
struct RawBucket {
    end_month: u8,
    #[serde(default)]
    sub_period: Option<SubPeriod>,
}

impl TryFrom<RawBucket> for Bucket {
    type Error = ValidationError;

    fn try_from(raw: RawBucket) -> Result<Self, Self::Error> {
        match raw.sub_period {
            Some(sub) => Bucket::half(raw.end_month, sub),
            None => Bucket::month(raw.end_month),
        }
    }
}

impl Bucket {
    /// A whole-month bucket ending at `end_month`.
    pub fn month(end_month: u8) -> Result<Self, ValidationError> {
        validate_month(end_month)?;
        Ok(Self {
            end_month,
            sub_period: None,
        })
    }

    /// A half-month bucket within `month`.
    pub fn half(month: u8, sub_period: SubPeriod) -> Result<Self, ValidationError> {
        validate_month(month)?;
        Ok(Self {
            end_month: month,
            sub_period: Some(sub_period),
        })
    }

    pub(crate) fn month_unchecked(end_month: u8) -> Self {
        Self {
            end_month,
            sub_period: None,
        }
    }

    pub(crate) fn half_unchecked(month: u8, sub_period: SubPeriod) -> Self {
        Self {
            end_month: month,
            sub_period: Some(sub_period),
        }
    }

    pub fn end_month(&self) -> u8 {
        self.end_month
    }

    pub fn sub_period(&self) -> Option<SubPeriod> {
        self.sub_period
    }

    /// Whether this bucket shape belongs to partitions of `period`.
    pub fn matches_period(&self, period: Period) -> bool {
        match (period, self.sub_period) {
            (Period::HalfMonth, Some(_)) => true,
            (Period::Months(span), None) => self.end_month % span.get() == 0,
            _ => false,
        }
    }

    /// Slots covered by this bucket when it belongs to `period`.
    pub fn span(&self, period: Period) -> SlotRange {
        match self.sub_period {
            Some(sub) => {
                let slot = (self.end_month - 1) * 2 + sub.number();
                SlotRange { first: slot, last: slot }
            }
            None => {
                let last = self.end_month * 2;
                let first = last + 1 - period.half_month_slots().min(last);
                SlotRange { first, last }
            }
        }
    }

    /// Short label used when concatenating notes, e.g. `Mar` or `Mar 21-30`.
    pub fn label(&self) -> String {
        match self.sub_period {
            Some(sub) => format!("{} {}", month_abbrev(self.end_month), sub.days()),
            None => month_abbrev(self.end_month).to_string(),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_period {
            Some(sub) => write!(f, "{}/{}", self.end_month, sub.number()),
            None => write!(f, "{}", self.end_month),
        }
    }
}

/// Inclusive range of half-month slots (1..=24) within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub first: u8,
    pub last: u8,
}

impl SlotRange {
    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &SlotRange) -> bool {
        self.first <= other.first && other.last <= self.last
    }

    /// Calendar months touched by this range, ascending.
    pub fn months(&self) -> impl Iterator<Item = u8> {
        let first = (self.first + 1) / 2;
        let last = (self.last + 1) / 2;
        first..=last
    }
}

fn validate_month(month: u8) -> Result<(), ValidationError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range("end_month", 1, 12, i32::from(month)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_months_outside_year() {
        assert!(Bucket::month(0).is_err());
        assert!(Bucket::month(13).is_err());
        assert!(Bucket::half(13, SubPeriod::First).is_err());
    }

    #[test]
    fn orders_chronologically() {
        let a = Bucket::half(3, SubPeriod::Second).unwrap();
        let b = Bucket::half(4, SubPeriod::First).unwrap();
        let c = Bucket::half(4, SubPeriod::Second).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn quarter_span_covers_three_months() {
        let q2 = Bucket::month(6).unwrap();
        let span = q2.span(Period::QUARTERLY);
        assert_eq!(span, SlotRange { first: 7, last: 12 });
        assert_eq!(span.months().collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn half_month_span_is_single_slot() {
        let late_may = Bucket::half(5, SubPeriod::Second).unwrap();
        assert_eq!(late_may.span(Period::HalfMonth), SlotRange { first: 10, last: 10 });
        assert!(Bucket::month(5)
            .unwrap()
            .span(Period::MONTHLY)
            .contains(&late_may.span(Period::HalfMonth)));
    }

    #[test]
    fn labels_use_month_abbreviation() {
        assert_eq!(Bucket::month(3).unwrap().label(), "Mar");
        assert_eq!(Bucket::half(12, SubPeriod::Second).unwrap().label(), "Dec 21-30");
    }

    #[test]
    fn matches_period_checks_shape() {
        assert!(Bucket::month(6).unwrap().matches_period(Period::QUARTERLY));
        assert!(!Bucket::month(5).unwrap().matches_period(Period::QUARTERLY));
        assert!(!Bucket::month(5).unwrap().matches_period(Period::HalfMonth));
        assert!(Bucket::half(5, SubPeriod::First).unwrap().matches_period(Period::HalfMonth));
    }

    #[test]
    fn serializes_without_sub_period_for_whole_months() {
        let json = serde_json::to_string(&Bucket::month(12).unwrap()).unwrap();
        assert_eq!(json, r#"{"end_month":12}"#);
        let json = serde_json::to_string(&Bucket::half(1, SubPeriod::Second).unwrap()).unwrap();
        assert_eq!(json, r#"{"end_month":1,"sub_period":2}"#);
    }

    #[test]
    fn deserialization_validates_fields() {
        assert!(serde_json::from_str::<Bucket>(r#"{"end_month":13}"#).is_err());
        assert!(serde_json::from_str::<Bucket>(r#"{"end_month":4,"sub_period":3}"#).is_err());
        let b: Bucket = serde_json::from_str(r#"{"end_month":4,"sub_period":1}"#).unwrap();
        assert_eq!(b, Bucket::half(4, SubPeriod::First).unwrap());
    }
}
