//! Percentages and derivability ratios.

use serde::{Deserialize, Serialize};

use crate::value::{to_fixed, try_round, CellValue};

/// Placeholder shown for missing data.
pub const MISSING: &str = "-";

/// Format `numerator / denominator` as a percentage with `decimals`
/// fraction digits (default 0).
///
/// Digits beyond [`MAX_FIXED_DIGITS`](crate::value::MAX_FIXED_DIGITS)
/// are clamped.
///
/// Equal operands short-circuit to `"100%"`, whatever `decimals` says.
/// Otherwise the ratio is first rounded to `decimals + 2` places, then
/// scaled by 100, so `to_percentage(1.0, 8.0, Some(0))` is `"13%"`.
///
/// Division by zero is not guarded: `1/0` gives `"Infinity%"` and NaN
/// operands give `"NaN%"`. `0/0` counts as equal operands.
pub fn to_percentage(numerator: f64, denominator: f64, decimals: Option<u32>) -> String {
    if numerator == denominator {
        return "100%".to_string();
    }
    let decimals = decimals.unwrap_or(0);
    let ratio = try_round(
        CellValue::Number(numerator / denominator),
        Some(decimals.saturating_add(2)),
    );
    format!("{}%", to_fixed(ratio.to_number() * 100.0, decimals))
}

/// Rules split into those a ruleset can derive and those it cannot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivability<T = String> {
    /// Derivable rules
    pub can: Vec<T>,
    /// Rules that could not be derived
    pub cannot: Vec<T>,
}

impl<T> Derivability<T> {
    pub fn new(can: Vec<T>, cannot: Vec<T>) -> Self {
        Self { can, cannot }
    }

    /// Total number of rules checked
    pub fn total(&self) -> usize {
        self.can.len() + self.cannot.len()
    }

    /// Derivable share as a percentage with one decimal
    pub fn percentage(&self) -> String {
        to_percentage(self.can.len() as f64, self.total() as f64, Some(1))
    }
}

/// Derivability ratio of a record, or `"-"` when there is none.
///
/// An empty record is 0 of 0 and reads as `"100%"`.
pub fn get_derivability<T>(record: Option<&Derivability<T>>) -> String {
    record.map_or_else(|| MISSING.to_string(), Derivability::percentage)
}
