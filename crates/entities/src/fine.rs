//! Monetary amounts for overdue fines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative monetary amount, stored in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fine(u64);

impl Fine {
    /// A zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in currency units, for display or export.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Linear fine: `rate_cents` per day, no compounding and no cap.
    pub fn per_day(rate_cents: u64, days_late: u32) -> Self {
        Self(rate_cents.saturating_mul(u64::from(days_late)))
    }
}

impl fmt::Display for Fine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
