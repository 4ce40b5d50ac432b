//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! engine's workflows. Everything below `engine` is pure and synchronous;
//! `RecommendationEngine` is the only part that touches the ports.
//!
//! Use cases:
//! - `OutcomeEvaluator`: Per-fixture EV, stakes and value bets
//! - `WeeklyPickAggregator`: Cross-fixture ranking with diversification
//! - `AccumulatorGenerator`: Correlation-filtered multi-leg combinations
//! - `PerformanceSummarizer`: Summary statistics for any recommendation set
//! - `RecommendationEngine`: Port gathering + exposed operations

pub mod accumulator_generator;
pub mod engine;
pub mod outcome_evaluator;
pub mod performance;
pub mod weekly_picks;

pub use accumulator_generator::{AccumulatorBatch, AccumulatorGenerator, GenerationStats};
pub use engine::{
  AccumulatorReport, RecommendationEngine, WeeklyReport, evaluate_fixture, generate_accumulators,
  get_weekly_picks,
};
pub use outcome_evaluator::{FixtureInputs, OutcomeEvaluation, OutcomeEvaluator, SkippedOutcome};
pub use performance::{AccumulatorSummary, PerformanceSummarizer, PerformanceSummary, Recommendation};
pub use weekly_picks::{PicksSummary, WeeklyPickAggregator, WeeklyPicks};
