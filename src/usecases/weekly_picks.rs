//! Weekly Pick Aggregator - Cross-fixture Ranking
//!
//! Takes the best value outcome of every evaluated fixture, ranks them by
//! EV and applies the market diversification cap to the returned list:
//! no market holds more than `floor(max_market_share * len)` of the `len`
//! picks returned. The list is the longest one (up to `top_picks`) that an
//! EV-ordered walk can fill under that cap, so it may be shorter than the
//! ranked input, or empty when too few markets carry value. Kept picks
//! retain their relative order.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::{BettingConfig, WeeklyConfig};
use crate::domain::fixture::FixtureId;
use crate::domain::kelly::round_money;
use crate::domain::market::MarketType;
use crate::domain::recommendation::BetRecommendation;

use super::outcome_evaluator::{FixtureInputs, OutcomeEvaluation, OutcomeEvaluator};
use super::performance::{PerformanceSummarizer, PerformanceSummary};

/// Summary attached to a weekly pick list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicksSummary {
  #[serde(flatten)]
  pub performance: PerformanceSummary,
  /// Value outcomes found across all fixtures (not only the picks).
  pub total_value_bets: usize,
  /// Sum of stake * EV over the picks.
  pub expected_profit: f64,
}

/// Ranked weekly picks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPicks {
  pub picks: Vec<BetRecommendation>,
  pub summary: PicksSummary,
  /// Picks dropped by the diversification cap.
  pub skipped_for_diversification: usize,
  /// Fixtures the oracle could not price.
  pub unevaluable: Vec<FixtureId>,
}

/// Aggregates per-fixture evaluations into a ranked pick list.
#[derive(Debug, Clone)]
pub struct WeeklyPickAggregator {
  evaluator: OutcomeEvaluator,
  config: WeeklyConfig,
}

impl WeeklyPickAggregator {
  pub fn new(betting: &BettingConfig, weekly: &WeeklyConfig) -> Self {
    Self {
      evaluator: OutcomeEvaluator::new(betting),
      config: weekly.clone(),
    }
  }

  /// Evaluate and aggregate fixtures in input order.
  pub fn aggregate(&self, inputs: &[FixtureInputs], bankroll: f64) -> WeeklyPicks {
    let evaluations: Vec<_> = self
      .bounded(inputs)
      .iter()
      .map(|input| self.evaluator.evaluate(input, bankroll))
      .collect();
    self.aggregate_evaluations(&evaluations, bankroll)
  }

  /// Aggregate evaluations that were already computed (possibly in
  /// parallel). Result order never depends on input completion order.
  pub fn aggregate_evaluations(
    &self,
    evaluations: &[OutcomeEvaluation],
    bankroll: f64,
  ) -> WeeklyPicks {
    let evaluations = self.bounded(evaluations);

    let unevaluable: Vec<FixtureId> = evaluations
      .iter()
      .filter(|e| !e.has_prediction)
      .map(|e| e.fixture.id)
      .collect();
    let total_value_bets = evaluations.iter().map(|e| e.value_outcomes.len()).sum();

    let mut ranked: Vec<BetRecommendation> = evaluations
      .iter()
      .filter_map(|e| e.best_outcome.clone())
      .collect();
    ranked.sort_by(BetRecommendation::rank_cmp);

    let (picks, skipped_for_diversification) = self.diversify(ranked);

    let expected_profit = round_money(picks.iter().map(|p| p.stake * p.ev).sum());
    let summary = PicksSummary {
      performance: PerformanceSummarizer::summarize(&picks, bankroll),
      total_value_bets,
      expected_profit,
    };

    info!(
      fixtures = evaluations.len(),
      picks = picks.len(),
      value_bets = total_value_bets,
      skipped = skipped_for_diversification,
      unevaluable = unevaluable.len(),
      total_stake = summary.performance.total_stake,
      "Weekly picks aggregated"
    );

    WeeklyPicks {
      picks,
      summary,
      skipped_for_diversification,
      unevaluable,
    }
  }

  /// Apply the market cap and `top_picks` limit to a ranked list.
  /// Returns the picks and how many the cap removed.
  fn diversify(&self, ranked: Vec<BetRecommendation>) -> (Vec<BetRecommendation>, usize) {
    let limit = self.config.top_picks.unwrap_or(usize::MAX);
    let target = ranked.len().min(limit);

    let Some(share) = self.config.max_market_share else {
      let mut picks = ranked;
      picks.truncate(limit);
      return (picks, 0);
    };

    for len in (1..=target).rev() {
      if let Some(picks) = fill_under_cap(&ranked, len, share) {
        return (picks, target - len);
      }
    }

    if target > 0 {
      debug!(ranked = ranked.len(), share, "No pick list satisfies the market cap");
    }
    (Vec::new(), target)
  }

  fn bounded<'a, T>(&self, items: &'a [T]) -> &'a [T] {
    if items.len() > self.config.max_fixtures {
      warn!(
        received = items.len(),
        max_fixtures = self.config.max_fixtures,
        "Fixture list truncated"
      );
      &items[..self.config.max_fixtures]
    } else {
      items
    }
  }
}

/// Walk `ranked` in order, taking picks whose market is below
/// `floor(share * len)`. Returns the picks only if exactly `len` were taken.
fn fill_under_cap(
  ranked: &[BetRecommendation],
  len: usize,
  share: f64,
) -> Option<Vec<BetRecommendation>> {
  let cap = (share * len as f64).floor() as usize;
  if cap == 0 {
    return None;
  }

  let mut per_market: BTreeMap<MarketType, usize> = BTreeMap::new();
  let mut picks = Vec::with_capacity(len);
  for pick in ranked {
    let used = per_market.entry(pick.outcome.market).or_insert(0);
    if *used >= cap {
      trace!(
        fixture_id = pick.fixture_id,
        market = %pick.outcome.market,
        cap,
        len,
        "Pick over market cap"
      );
      continue;
    }
    *used += 1;
    picks.push(pick.clone());
    if picks.len() == len {
      return Some(picks);
    }
  }
  None
}
