//! Engine error taxonomy.
//!
//! Only conditions that abort a whole call are errors. Per-item problems
//! (bad odds, missing predictions, too few legs, non-positive edge) are
//! absorbed as [`SkipReason`] diagnostics and never fail a batch.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to the caller of an engine operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration rejected before any computation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The caller-supplied deadline passed between work groups.
    #[error("deadline exceeded after {completed_groups} completed group(s)")]
    DeadlineExceeded {
        /// Leg-count groups fully evaluated before the deadline check.
        completed_groups: usize,
    },

    /// A blocking enumeration worker panicked or was cancelled.
    #[error("enumeration worker failed: {0}")]
    WorkerFailed(String),
}

/// Why an item was left out of a result. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Resolved odds were <= 1 (or not finite).
    InvalidOdds,
    /// Probability was <= 0, > 1 or not finite.
    InvalidProbability,
    /// Outcome key was listed under a market it does not belong to.
    MarketMismatch,
    /// The oracle returned nothing for the fixture.
    NoPrediction,
    /// Fewer qualifying legs than `min_legs`.
    InsufficientCandidates,
    /// Kelly edge was not positive, so the stake is zero.
    NonPositiveStake,
}

pub type EngineResult<T> = Result<T, EngineError>;
