//! Response Shaper — numeric coercion boundary
//!
//! Every aggregate value passes through these helpers before it enters the
//! report tree: monetary values are rounded to 2 decimal places,
//! percentages to 1, and any ratio with a non-positive denominator
//! collapses to 0 instead of NaN/Infinity. Uses rust_decimal internally,
//! emits f64 (the storage/wire convention).

use rust_decimal::prelude::*;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded half-up to `dp` places
#[inline]
fn to_f64(value: Decimal, dp: u32) -> f64 {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Monetary value: 2 decimal places
pub fn money(value: f64) -> f64 {
    to_f64(to_decimal(value), 2)
}

/// Percentage `numer / denom * 100`, 1 decimal place, 0 when denom <= 0
pub fn pct(numer: f64, denom: f64) -> f64 {
    if denom <= 0.0 {
        return 0.0;
    }
    to_f64(
        to_decimal(numer) / to_decimal(denom) * Decimal::ONE_HUNDRED,
        1,
    )
}

/// Mean of a set of percentages, 1 decimal place, 0 for the empty set
pub fn mean_pct(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: Decimal = values.iter().map(|v| to_decimal(*v)).sum();
    to_f64(sum / Decimal::from(values.len()), 1)
}
