//! Probability Oracle Port - Model Prediction Interface
//!
//! Defines the trait for obtaining per-outcome win probabilities for a
//! fixture from an external prediction model. The engine treats the
//! model as opaque: it never estimates probabilities itself.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::fixture::{Fixture, FixtureId};
use crate::domain::market::{MarketType, Outcome};
use crate::domain::recommendation::ConfidenceTier;

/// Probabilities for the outcomes of one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrediction {
  /// Outcome -> model probability in [0, 1].
  pub probabilities: BTreeMap<Outcome, f64>,
  /// Model confidence for this market.
  #[serde(default)]
  pub confidence: f64,
}

impl MarketPrediction {
  /// Confidence label (high > 0.6, medium > 0.5).
  pub fn confidence_tier(&self) -> ConfidenceTier {
    ConfidenceTier::from_model_confidence(self.confidence)
  }
}

/// Multi-market prediction for a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  /// Fixture the prediction is for.
  pub fixture_id: FixtureId,
  /// Model version that produced the prediction.
  #[serde(default)]
  pub model_version: String,
  /// Market -> outcome probabilities.
  pub markets: BTreeMap<MarketType, MarketPrediction>,
}

impl Prediction {
  /// Whether the prediction carries any outcome probability at all.
  pub fn is_empty(&self) -> bool {
    self.markets.values().all(|m| m.probabilities.is_empty())
  }
}

/// Trait for prediction model providers.
///
/// `Ok(None)` means the model has nothing for this fixture; the engine
/// skips the fixture without failing the batch. Timeouts and retries are
/// the implementor's responsibility.
#[async_trait]
pub trait ProbabilityOracle: Send + Sync + 'static {
  /// Predict outcome probabilities for a fixture.
  async fn predict(&self, fixture: &Fixture) -> anyhow::Result<Option<Prediction>>;
}
