//! Configuration Module - TOML-based Application Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Engine parameters live in [`EngineConfig`] and are handed to every
//! engine call explicitly - nothing is read from global state by the
//! domain or use-case layers.

pub mod engine;
pub mod loader;

use serde::Deserialize;

pub use engine::{AccumulatorConfig, BettingConfig, EngineConfig, MarketMultipliers, WeeklyConfig};

/// Top-level application configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the engine runs.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Run identity and bankroll.
  pub bot: BotConfig,
  /// Recommendation engine parameters.
  #[serde(default)]
  pub engine: EngineConfig,
  /// Fixture/prediction/odds snapshot source.
  pub snapshot: SnapshotConfig,
  /// Prediction cache.
  #[serde(default)]
  pub cache: CacheConfig,
  /// Metrics rendering.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Run identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable run name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Bankroll used for stake sizing.
  #[serde(default = "default_bankroll")]
  pub bankroll: f64,
  /// Optional wall-clock budget for accumulator generation (milliseconds).
  #[serde(default)]
  pub deadline_ms: Option<u64>,
}

/// Snapshot source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
  /// Path to the JSON snapshot of fixtures, predictions and odds.
  pub path: String,
}

/// Prediction cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Wrap the oracle in a TTL cache.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Time-to-live per cached prediction (seconds).
  #[serde(default = "default_cache_ttl")]
  pub ttl_seconds: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      ttl_seconds: default_cache_ttl(),
    }
  }
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Include Prometheus text exposition in the report.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_bankroll() -> f64 {
  10_000.0
}

fn default_cache_ttl() -> u64 {
  3600 // 1 hour
}
