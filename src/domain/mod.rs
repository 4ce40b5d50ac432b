//! Domain layer - Core betting math and models.
//!
//! This module contains the pure recommendation logic: EV, Kelly sizing,
//! market/outcome definitions, recommendation records, the structural
//! correlation heuristic and the combination generator.
//! No I/O here (hexagonal architecture inner ring).
//! All types are serializable and testable in isolation.

pub mod combinations;
pub mod correlation;
pub mod error;
pub mod ev;
pub mod fixture;
pub mod kelly;
pub mod market;
pub mod recommendation;

// Re-export core types for convenience
pub use combinations::{Combinations, binomial};
pub use correlation::{Correlation, CorrelationClassifier};
pub use error::{EngineError, EngineResult, SkipReason};
pub use ev::{ev_percent, expected_value};
pub use fixture::{Fixture, FixtureId, TeamId};
pub use kelly::{KellyCriterion, floor_money, round_money};
pub use market::{MarketType, Outcome};
pub use recommendation::{
    AccumulatorLeg, AccumulatorRecommendation, BetRecommendation, ConfidenceTier,
    MarketOutcome, OddsSource, SYNTHETIC_BOOKMAKER,
};
