//! Fixed-point monetary amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in the currency's minor unit (cents for USD) plus its
/// ISO-4217 code. Two decimal places are assumed when formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub minor_units: i64,
    pub currency: String,
}

impl Money {
    pub fn new(minor_units: i64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }

    /// Build from a major/minor split, e.g. `Money::from_major(12, 50, "EUR")`
    /// for 12.50 EUR.
    pub fn from_major(major: i64, minor: i64, currency: impl Into<String>) -> Self {
        let sign = if major < 0 { -1 } else { 1 };
        Self::new(major * 100 + sign * minor, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}
