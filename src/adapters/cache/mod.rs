//! Caching Adapters
//!
//! Caller-side caches wrapped around port implementations. The engine
//! core never owns or requires a cache.

pub mod prediction_cache;

pub use prediction_cache::{CachedOracle, PredictionCache};
