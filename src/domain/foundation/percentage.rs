//! Percentage value object (0-100 scale).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ValidationError;

/// A whole-number completion value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range(
                "percentage",
                0,
                100,
                value as i32,
            ));
        }
        Ok(Self(value))
    }

    /// Computes `round(100 * done / total)` with halves rounded up.
    ///
    /// A zero `total` yields zero. `done` larger than `total` saturates at 100.
    pub fn from_ratio(done: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let done = done.min(total);
        let rounded = (200 * done + total) / (2 * total);
        Self(rounded as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true for anything above zero.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Percentage::try_new(raw).map_err(serde::de::Error::custom)
    }
}
