//! Recommendation Engine - Exposed Operations
//!
//! Two layers:
//! - Pure functions (`evaluate_fixture`, `get_weekly_picks`,
//!   `generate_accumulators`) over already-gathered inputs. Each validates
//!   the configuration before computing anything.
//! - `RecommendationEngine`, which calls the oracle and odds catalog once
//!   per fixture (concurrently) and then runs the pure core.
//!
//! Port failures are absorbed per fixture: an oracle error marks the
//! fixture unevaluable, an odds error falls back to synthetic odds.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::config::EngineConfig;
use crate::domain::error::EngineResult;
use crate::domain::fixture::Fixture;
use crate::domain::recommendation::AccumulatorRecommendation;
use crate::ports::odds::OddsCatalog;
use crate::ports::oracle::ProbabilityOracle;

use super::accumulator_generator::{AccumulatorBatch, AccumulatorGenerator, GenerationStats};
use super::outcome_evaluator::{FixtureInputs, OutcomeEvaluation, OutcomeEvaluator};
use super::performance::AccumulatorSummary;
use super::weekly_picks::{WeeklyPickAggregator, WeeklyPicks};

/// Ranked accumulators with their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccumulatorReport {
  pub accumulators: Vec<AccumulatorRecommendation>,
  pub summary: AccumulatorSummary,
  pub stats: GenerationStats,
}

impl AccumulatorReport {
  fn from_batch(batch: AccumulatorBatch, bankroll: f64, config: &EngineConfig) -> Self {
    let summary = AccumulatorSummary::new(
      &batch.accumulators,
      bankroll,
      config.accumulator.max_portfolio_fraction,
      batch.stats.scale_factor,
    );
    Self {
      accumulators: batch.accumulators,
      summary,
      stats: batch.stats,
    }
  }
}

/// Picks and accumulators computed from a single gathering pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
  pub generated_at: DateTime<Utc>,
  pub bankroll: f64,
  pub fixtures: usize,
  pub picks: WeeklyPicks,
  pub accumulators: AccumulatorReport,
}

/// Evaluate one fixture.
///
/// # Errors
/// `InvalidConfiguration` if `config` is rejected.
pub fn evaluate_fixture(
  inputs: &FixtureInputs,
  bankroll: f64,
  config: &EngineConfig,
) -> EngineResult<OutcomeEvaluation> {
  config.validate()?;
  Ok(OutcomeEvaluator::new(&config.betting).evaluate(inputs, bankroll))
}

/// Rank the best pick of every fixture.
///
/// # Errors
/// `InvalidConfiguration` if `config` is rejected.
pub fn get_weekly_picks(
  inputs: &[FixtureInputs],
  bankroll: f64,
  config: &EngineConfig,
) -> EngineResult<WeeklyPicks> {
  config.validate()?;
  Ok(WeeklyPickAggregator::new(&config.betting, &config.weekly).aggregate(inputs, bankroll))
}

/// Build ranked accumulators from the value outcomes of every fixture.
///
/// # Errors
/// `InvalidConfiguration` if `config` is rejected, `DeadlineExceeded` if
/// `deadline` passes during enumeration.
pub fn generate_accumulators(
  inputs: &[FixtureInputs],
  bankroll: f64,
  config: &EngineConfig,
  deadline: Option<Instant>,
) -> EngineResult<AccumulatorReport> {
  config.validate()?;
  let evaluations = evaluate_all(inputs, bankroll, config);
  let legs = AccumulatorGenerator::legs_from_evaluations(&evaluations);
  let batch = AccumulatorGenerator::new(&config.accumulator).generate(legs, bankroll, deadline)?;
  Ok(AccumulatorReport::from_batch(batch, bankroll, config))
}

fn evaluate_all(
  inputs: &[FixtureInputs],
  bankroll: f64,
  config: &EngineConfig,
) -> Vec<OutcomeEvaluation> {
  let evaluator = OutcomeEvaluator::new(&config.betting);
  inputs
    .iter()
    .take(config.weekly.max_fixtures)
    .map(|input| evaluator.evaluate(input, bankroll))
    .collect()
}

/// Engine bound to a prediction oracle and an odds catalog.
pub struct RecommendationEngine<O: ProbabilityOracle, C: OddsCatalog> {
  oracle: Arc<O>,
  odds: Arc<C>,
  config: EngineConfig,
}

impl<O: ProbabilityOracle, C: OddsCatalog> RecommendationEngine<O, C> {
  /// Create an engine. The configuration is validated once here and
  /// again by every pure operation.
  ///
  /// # Errors
  /// `InvalidConfiguration` if `config` is rejected.
  pub fn new(oracle: Arc<O>, odds: Arc<C>, config: EngineConfig) -> EngineResult<Self> {
    config.validate()?;
    Ok(Self {
      oracle,
      odds,
      config,
    })
  }

  pub const fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Fetch prediction and odds for every fixture concurrently.
  ///
  /// Output follows input order regardless of completion order. At most
  /// `weekly.max_fixtures` fixtures are gathered.
  #[instrument(skip_all, fields(fixtures = fixtures.len()))]
  pub async fn gather(&self, fixtures: &[Fixture]) -> Vec<FixtureInputs> {
    let fixtures = &fixtures[..fixtures.len().min(self.config.weekly.max_fixtures)];
    let mut set = JoinSet::new();

    for (index, fixture) in fixtures.iter().cloned().enumerate() {
      let oracle = Arc::clone(&self.oracle);
      let odds = Arc::clone(&self.odds);

      set.spawn(async move {
        let (prediction, quotes) = tokio::join!(oracle.predict(&fixture), odds.latest_odds(fixture.id));

        let prediction = prediction.unwrap_or_else(|e| {
          warn!(fixture_id = fixture.id, error = %e, "Prediction failed, fixture skipped");
          None
        });
        let quotes = quotes.unwrap_or_else(|e| {
          warn!(fixture_id = fixture.id, error = %e, "Odds lookup failed, using synthetic odds");
          Vec::new()
        });

        (
          index,
          FixtureInputs {
            fixture,
            prediction,
            quotes,
          },
        )
      });
    }

    let mut slots: Vec<Option<FixtureInputs>> = vec![None; fixtures.len()];
    while let Some(joined) = set.join_next().await {
      match joined {
        Ok((index, inputs)) => slots[index] = Some(inputs),
        Err(e) => warn!(error = %e, "Fixture gathering task failed"),
      }
    }

    let gathered: Vec<_> = slots
      .into_iter()
      .zip(fixtures)
      .map(|(slot, fixture)| {
        slot.unwrap_or_else(|| FixtureInputs {
          fixture: fixture.clone(),
          prediction: None,
          quotes: Vec::new(),
        })
      })
      .collect();

    debug!(
      gathered = gathered.len(),
      predicted = gathered.iter().filter(|i| i.prediction.is_some()).count(),
      "Fixture inputs gathered"
    );
    gathered
  }

  /// Weekly picks for `fixtures`.
  ///
  /// # Errors
  /// `InvalidConfiguration` if the engine configuration is rejected.
  #[instrument(skip_all, fields(fixtures = fixtures.len(), bankroll = bankroll))]
  pub async fn weekly_picks(&self, fixtures: &[Fixture], bankroll: f64) -> EngineResult<WeeklyPicks> {
    let inputs = self.gather(fixtures).await;
    get_weekly_picks(&inputs, bankroll, &self.config)
  }

  /// Accumulators for `fixtures`, enumerated on blocking workers.
  ///
  /// # Errors
  /// `InvalidConfiguration` or `DeadlineExceeded`.
  #[instrument(skip_all, fields(fixtures = fixtures.len(), bankroll = bankroll))]
  pub async fn accumulators(
    &self,
    fixtures: &[Fixture],
    bankroll: f64,
    deadline: Option<Instant>,
  ) -> EngineResult<AccumulatorReport> {
    let inputs = self.gather(fixtures).await;
    self.accumulators_from(&inputs, bankroll, deadline).await
  }

  /// Picks and accumulators from one gathering pass.
  ///
  /// # Errors
  /// `InvalidConfiguration` or `DeadlineExceeded`.
  #[instrument(skip_all, fields(fixtures = fixtures.len(), bankroll = bankroll))]
  pub async fn weekly_report(
    &self,
    fixtures: &[Fixture],
    bankroll: f64,
    deadline: Option<Instant>,
  ) -> EngineResult<WeeklyReport> {
    let inputs = self.gather(fixtures).await;
    let picks = get_weekly_picks(&inputs, bankroll, &self.config)?;
    let accumulators = self.accumulators_from(&inputs, bankroll, deadline).await?;

    info!(
      picks = picks.picks.len(),
      accumulators = accumulators.accumulators.len(),
      "Weekly report ready"
    );

    Ok(WeeklyReport {
      generated_at: Utc::now(),
      bankroll,
      fixtures: inputs.len(),
      picks,
      accumulators,
    })
  }

  async fn accumulators_from(
    &self,
    inputs: &[FixtureInputs],
    bankroll: f64,
    deadline: Option<Instant>,
  ) -> EngineResult<AccumulatorReport> {
    self.config.validate()?;
    let evaluations = evaluate_all(inputs, bankroll, &self.config);
    let legs = AccumulatorGenerator::legs_from_evaluations(&evaluations);
    let batch = AccumulatorGenerator::new(&self.config.accumulator)
      .generate_partitioned(legs, bankroll, deadline)
      .await?;
    Ok(AccumulatorReport::from_batch(batch, bankroll, &self.config))
  }
}
