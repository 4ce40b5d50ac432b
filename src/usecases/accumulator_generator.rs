//! Accumulator Generator - Correlation-filtered Multi-leg Combinations
//!
//! Pipeline:
//! 1. Filter legs by probability and single EV, rank, cap the pool at M
//! 2. For each k in [min_legs, max_legs], enumerate C(n, k) combinations
//!    in lexicographic order and drop any with a correlated pair
//! 3. Price each survivor (products of leg probability and odds) and size
//!    it with fractional Kelly; drop zero stakes
//! 4. Merge, rank, filter by minimum EV, truncate, assign IDs
//! 5. Scale all stakes down proportionally if the set exceeds the
//!    portfolio budget
//!
//! Combined values assume the legs are independent. Correlation filtering
//! only removes structural overlap (same fixture or team).
//!
//! Enumeration can be partitioned by first-leg index. Every partition is
//! independent, and the merged result is re-sorted, so `generate` and
//! `generate_partitioned` return identical batches.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::AccumulatorConfig;
use crate::domain::combinations::Combinations;
use crate::domain::correlation::CorrelationClassifier;
use crate::domain::error::{EngineError, EngineResult, SkipReason};
use crate::domain::ev::{ev_percent, expected_value};
use crate::domain::kelly::{floor_money, round_money, KellyCriterion};
use crate::domain::recommendation::{AccumulatorLeg, AccumulatorRecommendation, ConfidenceTier};

use super::outcome_evaluator::OutcomeEvaluation;

/// Counters describing one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
  /// Legs left after filtering and the pool cap.
  pub candidates: usize,
  /// Combinations enumerated before any filter.
  pub combinations_considered: u64,
  pub rejected_correlated: u64,
  pub rejected_non_positive_stake: u64,
  pub rejected_below_min_ev: u64,
  /// Portfolio scaling applied to stakes (1 when under budget).
  pub scale_factor: f64,
}

impl Default for GenerationStats {
  fn default() -> Self {
    Self {
      candidates: 0,
      combinations_considered: 0,
      rejected_correlated: 0,
      rejected_non_positive_stake: 0,
      rejected_below_min_ev: 0,
      scale_factor: 1.0,
    }
  }
}

impl GenerationStats {
  fn absorb(&mut self, other: &Self) {
    self.combinations_considered += other.combinations_considered;
    self.rejected_correlated += other.rejected_correlated;
    self.rejected_non_positive_stake += other.rejected_non_positive_stake;
  }
}

/// Ranked accumulators plus the counters of the run that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccumulatorBatch {
  pub accumulators: Vec<AccumulatorRecommendation>,
  pub stats: GenerationStats,
}

/// Priced combinations of one partition, before ranking.
#[derive(Debug, Clone, Default)]
pub struct PartitionResult {
  pub accumulators: Vec<AccumulatorRecommendation>,
  pub stats: GenerationStats,
}

/// Builds accumulators from candidate legs.
#[derive(Debug, Clone)]
pub struct AccumulatorGenerator {
  config: AccumulatorConfig,
  classifier: CorrelationClassifier,
  kelly: KellyCriterion,
}

impl AccumulatorGenerator {
  pub fn new(config: &AccumulatorConfig) -> Self {
    Self {
      classifier: CorrelationClassifier::new(config.allow_same_fixture, config.allow_same_team),
      kelly: KellyCriterion::new(config.kelly_fraction, config.max_stake_fraction),
      config: config.clone(),
    }
  }

  /// Flatten the value outcomes of every evaluation into legs.
  pub fn legs_from_evaluations(evaluations: &[OutcomeEvaluation]) -> Vec<AccumulatorLeg> {
    evaluations
      .iter()
      .flat_map(|eval| {
        eval
          .value_outcomes
          .iter()
          .map(|bet| AccumulatorLeg::from_recommendation(bet, &eval.fixture))
      })
      .collect()
  }

  /// Filter by leg thresholds, rank, and cap the pool.
  pub fn select_candidates(&self, legs: Vec<AccumulatorLeg>) -> Vec<AccumulatorLeg> {
    let total = legs.len();
    let mut candidates: Vec<_> = legs
      .into_iter()
      .filter(|leg| {
        leg.probability >= self.config.min_leg_probability && leg.single_ev >= self.config.min_leg_ev
      })
      .collect();
    candidates.sort_by(AccumulatorLeg::rank_cmp);

    if candidates.len() > self.config.candidate_pool {
      debug!(
        qualifying = candidates.len(),
        pool = self.config.candidate_pool,
        "Candidate pool capped"
      );
      candidates.truncate(self.config.candidate_pool);
    }

    debug!(received = total, candidates = candidates.len(), "Candidate legs selected");
    candidates
  }

  /// Price every k-combination of `legs`, optionally restricted to those
  /// whose first index is `first`. Results are unranked and carry no ID.
  pub fn evaluate_partition(
    &self,
    legs: &[AccumulatorLeg],
    k: usize,
    first: Option<usize>,
    bankroll: f64,
  ) -> PartitionResult {
    let combinations = match first {
      Some(first) => Combinations::starting_at(legs.len(), k, first),
      None => Combinations::new(legs.len(), k),
    };

    let mut result = PartitionResult::default();
    for indices in combinations {
      result.stats.combinations_considered += 1;

      if self.classifier.any_correlated(indices.iter().map(|&i| &legs[i])) {
        result.stats.rejected_correlated += 1;
        continue;
      }

      let chosen = indices.iter().map(|&i| legs[i].clone()).collect();
      match self.price(chosen, bankroll) {
        Some(acc) => result.accumulators.push(acc),
        None => {
          trace!(reason = ?SkipReason::NonPositiveStake, ?indices, "Combination dropped");
          result.stats.rejected_non_positive_stake += 1;
        }
      }
    }
    result
  }

  /// Sequential generation.
  ///
  /// # Errors
  /// `DeadlineExceeded` if `deadline` passes before a leg-count group starts.
  pub fn generate(
    &self,
    legs: Vec<AccumulatorLeg>,
    bankroll: f64,
    deadline: Option<Instant>,
  ) -> EngineResult<AccumulatorBatch> {
    let candidates = self.select_candidates(legs);
    let mut stats = GenerationStats {
      candidates: candidates.len(),
      ..GenerationStats::default()
    };
    if self.insufficient(&candidates) {
      return Ok(AccumulatorBatch {
        accumulators: Vec::new(),
        stats,
      });
    }

    let mut priced = Vec::new();
    for (completed, k) in self.leg_counts(candidates.len()).enumerate() {
      check_deadline(deadline, completed)?;
      let result = self.evaluate_partition(&candidates, k, None, bankroll);
      log_group(k, &result);
      stats.absorb(&result.stats);
      priced.extend(result.accumulators);
    }

    Ok(self.finalize(priced, stats, bankroll))
  }

  /// Same result as [`generate`](Self::generate), with each first-leg
  /// partition evaluated on a blocking worker.
  ///
  /// Workers check the deadline before enumerating. After an overrun,
  /// workers that have not started return at once; a partition already
  /// being enumerated runs to completion in the background and its result
  /// is discarded.
  ///
  /// # Errors
  /// `DeadlineExceeded` when the deadline passes between groups or
  /// partitions; `WorkerFailed` if a worker panics.
  pub async fn generate_partitioned(
    &self,
    legs: Vec<AccumulatorLeg>,
    bankroll: f64,
    deadline: Option<Instant>,
  ) -> EngineResult<AccumulatorBatch> {
    let candidates = Arc::new(self.select_candidates(legs));
    let mut stats = GenerationStats {
      candidates: candidates.len(),
      ..GenerationStats::default()
    };
    if self.insufficient(&candidates) {
      return Ok(AccumulatorBatch {
        accumulators: Vec::new(),
        stats,
      });
    }

    let mut priced = Vec::new();
    for (completed, k) in self.leg_counts(candidates.len()).enumerate() {
      check_deadline(deadline, completed)?;

      let handles: Vec<_> = (0..=candidates.len() - k)
        .map(|first| {
          let generator = self.clone();
          let legs = Arc::clone(&candidates);
          tokio::task::spawn_blocking(move || {
            generator.run_partition(&legs, k, first, bankroll, deadline)
          })
        })
        .collect();

      let mut group = PartitionResult::default();
      for handle in handles {
        check_deadline(deadline, completed)?;
        let Some(result) = handle
          .await
          .map_err(|e| EngineError::WorkerFailed(e.to_string()))?
        else {
          return Err(EngineError::DeadlineExceeded {
            completed_groups: completed,
          });
        };
        group.stats.absorb(&result.stats);
        group.accumulators.extend(result.accumulators);
      }

      log_group(k, &group);
      stats.absorb(&group.stats);
      priced.extend(group.accumulators);
    }

    Ok(self.finalize(priced, stats, bankroll))
  }

  /// One first-leg partition on a worker, or `None` if the deadline has
  /// already passed.
  fn run_partition(
    &self,
    legs: &[AccumulatorLeg],
    k: usize,
    first: usize,
    bankroll: f64,
    deadline: Option<Instant>,
  ) -> Option<PartitionResult> {
    if deadline.is_some_and(|d| Instant::now() >= d) {
      trace!(k, first, "Partition skipped after deadline");
      return None;
    }
    Some(self.evaluate_partition(legs, k, Some(first), bankroll))
  }

  fn insufficient(&self, candidates: &[AccumulatorLeg]) -> bool {
    if candidates.len() < self.config.min_legs {
      debug!(
        reason = ?SkipReason::InsufficientCandidates,
        candidates = candidates.len(),
        min_legs = self.config.min_legs,
        "No accumulators generated"
      );
      return true;
    }
    false
  }

  /// Leg counts that have enough candidates.
  fn leg_counts(&self, candidates: usize) -> impl Iterator<Item = usize> {
    self.config.min_legs..=self.config.max_legs.min(candidates)
  }

  /// Combined metrics and stake; `None` when the stake is zero.
  fn price(&self, legs: Vec<AccumulatorLeg>, bankroll: f64) -> Option<AccumulatorRecommendation> {
    let combined_probability: f64 = legs.iter().map(|l| l.probability).product();
    let combined_odds: f64 = legs.iter().map(|l| l.odds).product();
    let ev = expected_value(combined_probability, combined_odds);

    let stake = self.kelly.stake(bankroll, combined_probability, combined_odds);
    if stake <= 0.0 {
      return None;
    }

    Some(AccumulatorRecommendation {
      id: String::new(),
      num_legs: legs.len(),
      legs,
      combined_probability,
      combined_odds,
      expected_value: ev,
      ev_percent: ev_percent(ev),
      suggested_stake: stake,
      potential_payout: round_money(stake * combined_odds),
      confidence: ConfidenceTier::from_ev(ev),
    })
  }

  /// Rank, filter, truncate, assign IDs, then apply the portfolio cap.
  fn finalize(
    &self,
    mut priced: Vec<AccumulatorRecommendation>,
    mut stats: GenerationStats,
    bankroll: f64,
  ) -> AccumulatorBatch {
    priced.sort_by(AccumulatorRecommendation::rank_cmp);

    let before = priced.len();
    priced.retain(|acc| acc.expected_value >= self.config.min_accumulator_ev);
    stats.rejected_below_min_ev = (before - priced.len()) as u64;
    priced.truncate(self.config.max_returned);

    let mut per_size = vec![0usize; self.config.max_legs + 1];
    for acc in &mut priced {
      per_size[acc.num_legs] += 1;
      acc.id = format!("acc_{}_{}", acc.num_legs, per_size[acc.num_legs]);
    }

    stats.scale_factor = self.apply_portfolio_cap(&mut priced, bankroll);

    info!(
      candidates = stats.candidates,
      considered = stats.combinations_considered,
      correlated = stats.rejected_correlated,
      returned = priced.len(),
      scale_factor = stats.scale_factor,
      "Accumulators generated"
    );

    AccumulatorBatch {
      accumulators: priced,
      stats,
    }
  }

  /// Scale stakes so their sum fits `bankroll * max_portfolio_fraction`.
  /// Returns the factor applied.
  fn apply_portfolio_cap(&self, accumulators: &mut [AccumulatorRecommendation], bankroll: f64) -> f64 {
    let total: f64 = accumulators.iter().map(|a| a.suggested_stake).sum();
    let budget = bankroll * self.config.max_portfolio_fraction;
    if total <= budget || total <= 0.0 {
      return 1.0;
    }

    let factor = budget / total;
    warn!(total, budget, factor, "Accumulator stakes exceed portfolio budget, scaling down");

    for acc in accumulators {
      acc.suggested_stake = floor_money(acc.suggested_stake * factor);
      acc.potential_payout = round_money(acc.suggested_stake * acc.combined_odds);
    }
    factor
  }
}

fn check_deadline(deadline: Option<Instant>, completed_groups: usize) -> EngineResult<()> {
  match deadline {
    Some(deadline) if Instant::now() >= deadline => {
      warn!(completed_groups, "Accumulator generation deadline exceeded");
      Err(EngineError::DeadlineExceeded { completed_groups })
    }
    _ => Ok(()),
  }
}

fn log_group(k: usize, result: &PartitionResult) {
  debug!(
    legs = k,
    considered = result.stats.combinations_considered,
    correlated = result.stats.rejected_correlated,
    priced = result.accumulators.len(),
    "Leg-count group evaluated"
  );
}
