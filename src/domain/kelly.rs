//! Kelly Criterion stake sizing for decimal odds.
//!
//! Implements fractional Kelly with a hard per-bet cap. Singles use
//! quarter-Kelly by default and accumulators eighth-Kelly, which keeps
//! variance manageable while retaining most of the growth rate.
//!
//! Stakes are money: they are rounded to cents with `Decimal` so the
//! rounding is exact and half-away-from-zero.

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;

use super::ev::expected_value;

/// Fractional Kelly calculator for decimal (European) odds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KellyCriterion {
    /// Kelly fraction multiplier (0.25 = quarter-Kelly).
    fraction: f64,
    /// Maximum stake as fraction of bankroll.
    max_stake_fraction: f64,
}

impl KellyCriterion {
    /// Creates a new Kelly calculator with the given fraction and cap.
    pub const fn new(fraction: f64, max_stake_fraction: f64) -> Self {
        Self {
            fraction,
            max_stake_fraction,
        }
    }

    /// Full Kelly fraction.
    ///
    /// Kelly formula for a fixed-odds bet:
    ///   f* = (b * p - q) / b
    /// where:
    ///   b = odds - 1 (net payout per unit)
    ///   p = probability of winning
    ///   q = 1 - p
    ///
    /// The numerator equals `p * odds - 1`, so it is computed through the
    /// EV formula. Returns 0 when `b <= 0`; the result may be negative.
    pub fn raw_fraction(probability: f64, odds: f64) -> f64 {
        let b = odds - 1.0;
        if b <= 0.0 || !b.is_finite() {
            return 0.0;
        }
        expected_value(probability, odds) / b
    }

    /// Fraction of bankroll to stake, clamped to `[0, max_stake_fraction]`.
    pub fn optimal_fraction(&self, probability: f64, odds: f64) -> f64 {
        let full_kelly = Self::raw_fraction(probability, odds);

        if full_kelly <= 0.0 || full_kelly.is_nan() {
            return 0.0;
        }

        (full_kelly * self.fraction).clamp(0.0, self.max_stake_fraction)
    }

    /// Stake in currency units, rounded to cents.
    pub fn stake(&self, bankroll: f64, probability: f64, odds: f64) -> f64 {
        if bankroll <= 0.0 || !bankroll.is_finite() {
            return 0.0;
        }
        round_money(self.optimal_fraction(probability, odds) * bankroll)
    }

    /// Kelly fraction multiplier.
    pub const fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Per-bet cap as fraction of bankroll.
    pub const fn max_stake_fraction(&self) -> f64 {
        self.max_stake_fraction
    }
}

impl Default for KellyCriterion {
    /// Default: quarter-Kelly with 5% max stake.
    fn default() -> Self {
        Self::new(0.25, 0.05)
    }
}

/// Rounds a money amount to cents, half away from zero.
pub fn round_money(amount: f64) -> f64 {
    round_cents(amount, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a money amount down to cents (toward zero).
///
/// Used when scaling stakes to a budget so the rounded sum never exceeds it.
pub fn floor_money(amount: f64) -> f64 {
    round_cents(amount, RoundingStrategy::ToZero)
}

fn round_cents(amount: f64, strategy: RoundingStrategy) -> f64 {
    Decimal::from_f64(amount)
        .map(|d| d.round_dp_with_strategy(2, strategy))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}
