//! Outcome Evaluator - Per-fixture Value Bet Detection
//!
//! For one fixture:
//! 1. Resolves odds per outcome (best bookmaker quote, else synthetic)
//! 2. Skips outcomes with probability <= 0 or odds <= 1
//! 3. Computes EV and market-adjusted fractional-Kelly stake
//! 4. Ranks every outcome and keeps those above the EV threshold
//!
//! Synthetic odds are `(1 / p) * (1 - margin)`. They stand in for a
//! missing quote only and inherit the model's view of the price, so
//! any EV they show is an approximation, not a market edge.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::BettingConfig;
use crate::domain::error::SkipReason;
use crate::domain::ev::{ev_percent, expected_value};
use crate::domain::fixture::Fixture;
use crate::domain::kelly::KellyCriterion;
use crate::domain::market::{MarketType, Outcome};
use crate::domain::recommendation::{
  BetRecommendation, MarketOutcome, OddsSource, SYNTHETIC_BOOKMAKER,
};
use crate::ports::odds::OddsQuote;
use crate::ports::oracle::Prediction;

/// Everything the evaluator needs for one fixture, gathered by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureInputs {
  pub fixture: Fixture,
  /// `None` when the oracle had nothing for the fixture.
  pub prediction: Option<Prediction>,
  /// Latest bookmaker quotes (may be empty).
  pub quotes: Vec<OddsQuote>,
}

/// An outcome left out of the evaluation, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedOutcome {
  pub market: MarketType,
  pub outcome: Outcome,
  pub reason: SkipReason,
}

/// Result of evaluating every market outcome of a fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeEvaluation {
  pub fixture: Fixture,
  /// Whether the oracle returned a usable prediction.
  pub has_prediction: bool,
  /// All priced outcomes, ranked.
  pub all_outcomes: Vec<BetRecommendation>,
  /// Outcomes with EV >= threshold, same order.
  pub value_outcomes: Vec<BetRecommendation>,
  /// First value outcome.
  pub best_outcome: Option<BetRecommendation>,
  /// Stake of the best outcome (0 when there is none).
  pub suggested_stake: f64,
  /// Sum of value outcome EVs.
  pub total_ev: f64,
  /// Diagnostics for excluded outcomes.
  pub skipped: Vec<SkippedOutcome>,
}

impl OutcomeEvaluation {
  /// Evaluation of a fixture the oracle could not price.
  pub const fn empty(fixture: Fixture) -> Self {
    Self {
      fixture,
      has_prediction: false,
      all_outcomes: Vec::new(),
      value_outcomes: Vec::new(),
      best_outcome: None,
      suggested_stake: 0.0,
      total_ev: 0.0,
      skipped: Vec::new(),
    }
  }
}

/// Evaluates fixtures against a betting configuration.
#[derive(Debug, Clone)]
pub struct OutcomeEvaluator {
  config: BettingConfig,
}

impl OutcomeEvaluator {
  /// Create an evaluator for the given configuration.
  pub fn new(config: &BettingConfig) -> Self {
    Self {
      config: config.clone(),
    }
  }

  /// Evaluate every predicted outcome of a fixture.
  ///
  /// Never fails: missing predictions yield an empty evaluation and bad
  /// outcomes are recorded in `skipped`.
  #[instrument(skip_all, fields(fixture_id = inputs.fixture.id))]
  pub fn evaluate(&self, inputs: &FixtureInputs, bankroll: f64) -> OutcomeEvaluation {
    let Some(prediction) = inputs.prediction.as_ref().filter(|p| !p.is_empty()) else {
      debug!(
        fixture = %inputs.fixture.label(),
        reason = ?SkipReason::NoPrediction,
        "Fixture skipped"
      );
      return OutcomeEvaluation::empty(inputs.fixture.clone());
    };

    let board = best_quotes(&inputs.quotes);
    let mut all_outcomes = Vec::new();
    let mut skipped = Vec::new();

    for (&market, market_prediction) in &prediction.markets {
      for (&outcome, &probability) in &market_prediction.probabilities {
        let skip = |reason| SkippedOutcome {
          market,
          outcome,
          reason,
        };

        if outcome.market() != market {
          skipped.push(skip(SkipReason::MarketMismatch));
          continue;
        }

        if !(probability > 0.0 && probability <= 1.0) {
          skipped.push(skip(SkipReason::InvalidProbability));
          continue;
        }

        let (odds, bookmaker, odds_source) = match board.get(&outcome) {
          Some(quote) => (quote.value, quote.bookmaker.clone(), OddsSource::Quoted),
          None => (
            self.synthetic_odds(probability),
            SYNTHETIC_BOOKMAKER.to_string(),
            OddsSource::Synthetic,
          ),
        };

        if !(odds > 1.0 && odds.is_finite()) {
          debug!(%outcome, odds, "Invalid odds, outcome excluded");
          skipped.push(skip(SkipReason::InvalidOdds));
          continue;
        }

        let ev = expected_value(probability, odds);
        let kelly = KellyCriterion::new(
          self.config.kelly_fraction_for(market),
          self.config.max_bet_fraction,
        );

        all_outcomes.push(BetRecommendation {
          fixture_id: inputs.fixture.id,
          outcome: MarketOutcome {
            market,
            outcome,
            probability,
            odds,
            bookmaker,
            odds_source,
            confidence: market_prediction.confidence,
            confidence_tier: market_prediction.confidence_tier(),
          },
          description: outcome.description().to_string(),
          ev,
          ev_percent: ev_percent(ev),
          stake: kelly.stake(bankroll, probability, odds),
        });
      }
    }

    all_outcomes.sort_by(BetRecommendation::rank_cmp);

    let value_outcomes: Vec<_> = all_outcomes
      .iter()
      .filter(|bet| bet.ev >= self.config.min_ev_threshold)
      .cloned()
      .collect();

    let best_outcome = value_outcomes.first().cloned();
    let suggested_stake = best_outcome.as_ref().map_or(0.0, |bet| bet.stake);
    let total_ev = value_outcomes.iter().map(|bet| bet.ev).sum();

    debug!(
      fixture = %inputs.fixture.label(),
      evaluated = all_outcomes.len(),
      value = value_outcomes.len(),
      skipped = skipped.len(),
      "Fixture evaluated"
    );

    OutcomeEvaluation {
      fixture: inputs.fixture.clone(),
      has_prediction: true,
      all_outcomes,
      value_outcomes,
      best_outcome,
      suggested_stake,
      total_ev,
      skipped,
    }
  }

  /// Fair odds minus the configured margin.
  fn synthetic_odds(&self, probability: f64) -> f64 {
    (1.0 / probability) * (1.0 - self.config.synthetic_margin)
  }
}

/// Best quote per outcome: highest odds, ties to the smallest bookmaker
/// name. Unrecognised labels and non-finite values are ignored.
pub fn best_quotes(quotes: &[OddsQuote]) -> BTreeMap<Outcome, &OddsQuote> {
  let mut board: BTreeMap<Outcome, &OddsQuote> = BTreeMap::new();

  for quote in quotes {
    let Some(outcome) = quote.outcome() else {
      debug!(
        market = %quote.market,
        outcome = %quote.outcome,
        "Unrecognised odds label ignored"
      );
      continue;
    };
    if !quote.value.is_finite() {
      continue;
    }

    board
      .entry(outcome)
      .and_modify(|current| {
        let better = quote.value > current.value
          || (quote.value == current.value && quote.bookmaker < current.bookmaker);
        if better {
          *current = quote;
        }
      })
      .or_insert(quote);
  }

  board
}
