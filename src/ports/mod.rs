//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use-case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ProbabilityOracle`: Per-fixture outcome probabilities from a model
//! - `OddsCatalog`: Latest bookmaker quotes per fixture

pub mod odds;
pub mod oracle;

pub use odds::{OddsCatalog, OddsQuote};
pub use oracle::{MarketPrediction, Prediction, ProbabilityOracle};
