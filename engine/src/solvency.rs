//! Solvency classification of projected balances.

use core::fmt;
use serde::Serialize;

/// Share of the total property worth the reserve must hold: 0.5%.
pub const MINIMUM_RESERVE_RATIO: f64 = 0.005;

/// Risk tier of a projected balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// Above the minimum reserve.
    Healthy,
    /// Solvent but not above the minimum reserve.
    Warning,
    /// Negative balance.
    Critical,
}

impl Tier {
    /// Colour token the planning screens use for this tier.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Healthy => "green",
            Self::Warning => "orange",
            Self::Critical => "red",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Minimum reserve for a property of `total_worth` at `ratio`.
///
/// Non-finite inputs give 0.
#[must_use]
pub fn minimum_required(total_worth: f64, ratio: f64) -> f64 {
    let minimum = total_worth * ratio;
    if minimum.is_finite() { minimum } else { 0.0 }
}

/// Classifies a balance against the default 0.5% minimum reserve.
#[must_use]
pub fn classify(cash: f64, total_worth: f64) -> Tier {
    classify_with(cash, total_worth, MINIMUM_RESERVE_RATIO)
}

/// Classifies a balance against `ratio` of the total worth.
///
/// Critical below 0, Warning from 0 up to and including the minimum
/// reserve, Healthy only strictly above it. A NaN balance is Critical.
/// Without a usable minimum (worth 0 or non-finite) only the sign counts.
#[must_use]
pub fn classify_with(cash: f64, total_worth: f64, ratio: f64) -> Tier {
    let minimum = minimum_required(total_worth, ratio);
    if cash.is_nan() || cash < 0.0 {
        Tier::Critical
    } else if minimum > 0.0 && cash <= minimum {
        Tier::Warning
    } else {
        Tier::Healthy
    }
}
