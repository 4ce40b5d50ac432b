//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.bot.name,
    bankroll = config.bot.bankroll,
    kelly = config.engine.betting.kelly_fraction,
    min_legs = config.engine.accumulator.min_legs,
    max_legs = config.engine.accumulator.max_legs,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Positive bankroll
/// - Non-empty snapshot path
/// - Engine parameter ranges (delegated to `EngineConfig::validate`)
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    config.bot.bankroll.is_finite() && config.bot.bankroll > 0.0,
    "bankroll must be positive, got {}",
    config.bot.bankroll
  );

  anyhow::ensure!(
    !config.snapshot.path.is_empty(),
    "snapshot.path must not be empty"
  );

  config
    .engine
    .validate()
    .context("Engine configuration rejected")?;

  Ok(())
}
