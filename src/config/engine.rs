//! Engine Configuration - Per-call Recommendation Parameters
//!
//! `EngineConfig` is an explicit value passed into every engine call.
//! There is no process-wide default instance; `Default` only supplies
//! the starting values used by `config.toml` when a field is omitted.

use serde::{Deserialize, Serialize};

use crate::domain::error::{EngineError, EngineResult};
use crate::domain::market::MarketType;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Single-bet evaluation parameters.
  pub betting: BettingConfig,
  /// Weekly pick aggregation parameters.
  pub weekly: WeeklyConfig,
  /// Accumulator generation parameters.
  pub accumulator: AccumulatorConfig,
}

/// Single-bet evaluation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BettingConfig {
  /// Minimum EV for an outcome to count as a value bet.
  pub min_ev_threshold: f64,
  /// Kelly fraction multiplier (0.25 = quarter-Kelly).
  pub kelly_fraction: f64,
  /// Maximum stake per single bet as fraction of bankroll.
  pub max_bet_fraction: f64,
  /// Bookmaker margin removed from fair odds when no quote exists.
  pub synthetic_margin: f64,
  /// Per-market multipliers applied to `kelly_fraction`.
  pub market_multipliers: MarketMultipliers,
}

impl Default for BettingConfig {
  fn default() -> Self {
    Self {
      min_ev_threshold: 0.03,
      kelly_fraction: 0.25,
      max_bet_fraction: 0.05,
      synthetic_margin: 0.05,
      market_multipliers: MarketMultipliers::default(),
    }
  }
}

impl BettingConfig {
  /// Effective Kelly fraction for a market.
  pub fn kelly_fraction_for(&self, market: MarketType) -> f64 {
    self.kelly_fraction * self.market_multipliers.for_market(market)
  }
}

/// Kelly multipliers per market. Goal markets are sized more conservatively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMultipliers {
  #[serde(rename = "1x2")]
  pub match_result: f64,
  pub over_under: f64,
  pub btts: f64,
}

impl Default for MarketMultipliers {
  fn default() -> Self {
    Self {
      match_result: 1.0,
      over_under: 0.8,
      btts: 0.8,
    }
  }
}

impl MarketMultipliers {
  pub const fn for_market(&self, market: MarketType) -> f64 {
    match market {
      MarketType::MatchResult => self.match_result,
      MarketType::OverUnder => self.over_under,
      MarketType::Btts => self.btts,
    }
  }
}

/// Weekly pick aggregation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyConfig {
  /// Upper bound on fixtures evaluated per call.
  pub max_fixtures: usize,
  /// Max share of returned picks any single market may take.
  /// `None` disables the diversification cap.
  pub max_market_share: Option<f64>,
  /// Optional truncation of the ranked pick list.
  pub top_picks: Option<usize>,
}

impl Default for WeeklyConfig {
  fn default() -> Self {
    Self {
      max_fixtures: 20,
      max_market_share: Some(0.4),
      top_picks: None,
    }
  }
}

/// Accumulator generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorConfig {
  /// Minimum legs per accumulator.
  pub min_legs: usize,
  /// Maximum legs per accumulator.
  pub max_legs: usize,
  /// Minimum model probability per leg.
  pub min_leg_probability: f64,
  /// Minimum single-bet EV per leg.
  pub min_leg_ev: f64,
  /// Minimum combined EV for a returned accumulator.
  pub min_accumulator_ev: f64,
  /// Kelly fraction for accumulators (0.125 = eighth-Kelly).
  pub kelly_fraction: f64,
  /// Max stake per accumulator as fraction of bankroll.
  pub max_stake_fraction: f64,
  /// Max total stake across returned accumulators as fraction of bankroll.
  pub max_portfolio_fraction: f64,
  /// Max accumulators returned.
  pub max_returned: usize,
  /// Top-M candidate legs kept before enumeration.
  pub candidate_pool: usize,
  /// Allow several legs from the same fixture.
  pub allow_same_fixture: bool,
  /// Allow the same team to appear in different legs.
  pub allow_same_team: bool,
}

impl Default for AccumulatorConfig {
  fn default() -> Self {
    Self {
      min_legs: 2,
      max_legs: 3,
      min_leg_probability: 0.40,
      min_leg_ev: 0.0,
      min_accumulator_ev: 0.05,
      kelly_fraction: 0.125,
      max_stake_fraction: 0.20,
      max_portfolio_fraction: 0.20,
      max_returned: 5,
      candidate_pool: 20,
      allow_same_fixture: false,
      allow_same_team: false,
    }
  }
}

impl EngineConfig {
  /// Validate every parameter. Called before any computation.
  ///
  /// # Errors
  /// Returns `EngineError::InvalidConfiguration` naming the first
  /// offending field.
  pub fn validate(&self) -> EngineResult<()> {
    self.betting.validate()?;
    self.weekly.validate()?;
    self.accumulator.validate()
  }
}

impl BettingConfig {
  /// Validate single-bet parameters.
  pub fn validate(&self) -> EngineResult<()> {
    ensure(
      self.min_ev_threshold.is_finite(),
      format!("min_ev_threshold must be finite, got {}", self.min_ev_threshold),
    )?;
    ensure_kelly_fraction("kelly_fraction", self.kelly_fraction)?;
    ensure_unit_fraction("max_bet_fraction", self.max_bet_fraction)?;
    ensure(
      (0.0..1.0).contains(&self.synthetic_margin),
      format!("synthetic_margin must be in [0, 1), got {}", self.synthetic_margin),
    )?;
    for market in MarketType::ALL {
      let multiplier = self.market_multipliers.for_market(market);
      ensure(
        multiplier.is_finite() && multiplier >= 0.0,
        format!("market multiplier for {market} must be >= 0, got {multiplier}"),
      )?;
    }
    Ok(())
  }
}

impl WeeklyConfig {
  /// Validate aggregation parameters.
  pub fn validate(&self) -> EngineResult<()> {
    ensure(self.max_fixtures > 0, "max_fixtures must be positive")?;
    if let Some(share) = self.max_market_share {
      ensure(
        share > 0.0 && share <= 1.0,
        format!("max_market_share must be in (0, 1], got {share}"),
      )?;
    }
    ensure(self.top_picks != Some(0), "top_picks must be positive when set")
  }
}

impl AccumulatorConfig {
  /// Validate accumulator parameters.
  pub fn validate(&self) -> EngineResult<()> {
    ensure(self.min_legs >= 1, "min_legs must be at least 1")?;
    ensure(
      self.min_legs <= self.max_legs,
      format!(
        "min_legs ({}) must not exceed max_legs ({})",
        self.min_legs, self.max_legs
      ),
    )?;
    ensure(
      self.candidate_pool >= self.max_legs,
      format!(
        "candidate_pool ({}) must be at least max_legs ({})",
        self.candidate_pool, self.max_legs
      ),
    )?;
    ensure(self.max_returned > 0, "max_returned must be positive")?;
    ensure_unit_fraction("min_leg_probability", self.min_leg_probability)?;
    ensure(
      self.min_leg_ev.is_finite() && self.min_accumulator_ev.is_finite(),
      "EV thresholds must be finite",
    )?;
    ensure_kelly_fraction("accumulator kelly_fraction", self.kelly_fraction)?;
    ensure_unit_fraction("max_stake_fraction", self.max_stake_fraction)?;
    ensure_unit_fraction("max_portfolio_fraction", self.max_portfolio_fraction)
  }
}

fn ensure(condition: bool, message: impl Into<String>) -> EngineResult<()> {
  if condition {
    Ok(())
  } else {
    Err(EngineError::InvalidConfiguration(message.into()))
  }
}

fn ensure_unit_fraction(name: &str, value: f64) -> EngineResult<()> {
  ensure(
    (0.0..=1.0).contains(&value),
    format!("{name} must be in [0, 1], got {value}"),
  )
}

fn ensure_kelly_fraction(name: &str, value: f64) -> EngineResult<()> {
  ensure(
    value > 0.0 && value <= 1.0,
    format!("{name} must be in (0, 1], got {value}"),
  )
}
