//! Performance Summarizer - Recommendation Set Statistics
//!
//! Pure aggregation over singles or accumulators. Totals are rounded to
//! cents; averages are left exact. Summarising the same set twice always
//! gives the same result.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::kelly::round_money;
use crate::domain::recommendation::{AccumulatorRecommendation, BetRecommendation};

/// Anything the summarizer can aggregate.
pub trait Recommendation {
  fn stake(&self) -> f64;
  fn potential_payout(&self) -> f64;
  fn expected_value(&self) -> f64;
  /// Breakdown bucket: market for singles, leg count for accumulators.
  fn breakdown_key(&self) -> String;
}

impl Recommendation for BetRecommendation {
  fn stake(&self) -> f64 {
    self.stake
  }

  fn potential_payout(&self) -> f64 {
    BetRecommendation::potential_payout(self)
  }

  fn expected_value(&self) -> f64 {
    self.ev
  }

  fn breakdown_key(&self) -> String {
    self.outcome.market.as_str().to_string()
  }
}

impl Recommendation for AccumulatorRecommendation {
  fn stake(&self) -> f64 {
    self.suggested_stake
  }

  fn potential_payout(&self) -> f64 {
    self.potential_payout
  }

  fn expected_value(&self) -> f64 {
    self.expected_value
  }

  fn breakdown_key(&self) -> String {
    leg_count_key(self.num_legs)
  }
}

/// Breakdown key for accumulators with `legs` legs.
pub fn leg_count_key(legs: usize) -> String {
  format!("{legs}_legs")
}

/// Summary statistics for a recommendation set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
  pub count: usize,
  pub total_stake: f64,
  pub total_potential_payout: f64,
  /// Mean EV (0 for an empty set).
  pub average_ev: f64,
  pub best_ev: Option<f64>,
  pub breakdown: BTreeMap<String, usize>,
  pub bankroll: f64,
  /// Total stake as a percentage of bankroll.
  pub exposure_percent: f64,
}

/// Stateless aggregator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceSummarizer;

impl PerformanceSummarizer {
  /// Summarise a recommendation set against a bankroll.
  pub fn summarize<R: Recommendation>(items: &[R], bankroll: f64) -> PerformanceSummary {
    let mut breakdown = BTreeMap::new();
    let mut total_stake = 0.0;
    let mut total_payout = 0.0;
    let mut total_ev = 0.0;
    let mut best_ev: Option<f64> = None;

    for item in items {
      total_stake += item.stake();
      total_payout += item.potential_payout();
      total_ev += item.expected_value();
      best_ev = Some(best_ev.map_or(item.expected_value(), |b| b.max(item.expected_value())));
      *breakdown.entry(item.breakdown_key()).or_insert(0) += 1;
    }

    let total_stake = round_money(total_stake);
    let average_ev = if items.is_empty() {
      0.0
    } else {
      total_ev / items.len() as f64
    };
    let exposure_percent = if bankroll > 0.0 {
      total_stake / bankroll * 100.0
    } else {
      0.0
    };

    PerformanceSummary {
      count: items.len(),
      total_stake,
      total_potential_payout: round_money(total_payout),
      average_ev,
      best_ev,
      breakdown,
      bankroll,
      exposure_percent,
    }
  }
}

/// Accumulator-specific summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccumulatorSummary {
  #[serde(flatten)]
  pub performance: PerformanceSummary,
  pub doubles: usize,
  pub trebles: usize,
  /// Portfolio budget: bankroll * max_portfolio_fraction.
  pub max_stake_allocation: f64,
  /// Factor applied to every stake by the portfolio cap (1 when unscaled).
  pub scale_factor: f64,
}

impl AccumulatorSummary {
  pub fn new(
    accumulators: &[AccumulatorRecommendation],
    bankroll: f64,
    max_portfolio_fraction: f64,
    scale_factor: f64,
  ) -> Self {
    let performance = PerformanceSummarizer::summarize(accumulators, bankroll);
    let count_of = |legs| {
      performance
        .breakdown
        .get(&leg_count_key(legs))
        .copied()
        .unwrap_or(0)
    };

    Self {
      doubles: count_of(2),
      trebles: count_of(3),
      max_stake_allocation: round_money(bankroll * max_portfolio_fraction),
      scale_factor,
      performance,
    }
  }
}
