//! OddsIQ Recommendation Engine - Entry Point
//!
//! Produces one weekly report (value picks + accumulators) from a JSON
//! snapshot and prints it as JSON on stdout. Logs go to stderr.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate (path: first argument, `ODDSIQ_CONFIG`,
//!    or `config.toml`)
//! 2. Init tracing (JSON structured logging)
//! 3. Load the snapshot (implements both oracle and odds ports)
//! 4. Optionally wrap the oracle in the TTL prediction cache
//! 5. Run the engine: gather inputs, picks, accumulators
//! 6. Record + render Prometheus metrics
//! 7. Print the report

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use oddsiq_engine::adapters::cache::CachedOracle;
use oddsiq_engine::adapters::metrics::EngineMetrics;
use oddsiq_engine::adapters::persistence::SnapshotSource;
use oddsiq_engine::config::{self, AppConfig};
use oddsiq_engine::ports::ProbabilityOracle;
use oddsiq_engine::usecases::{RecommendationEngine, WeeklyReport};

/// Report printed on stdout.
#[derive(Serialize)]
struct CliReport {
    run: String,
    #[serde(flatten)]
    report: WeeklyReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ODDSIQ_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.bot.log_level)
                }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        bankroll = config.bot.bankroll,
        cache = config.cache.enabled,
        "Starting OddsIQ recommendation engine"
    );

    // ── 3. Load snapshot ─────────────────────────────────────
    let source = SnapshotSource::load(&config.snapshot.path)
        .await
        .context("Failed to load snapshot")?;
    let odds = Arc::new(source.clone());

    // ── 4. Oracle, cached or direct ──────────────────────────
    let report = if config.cache.enabled {
        let oracle = Arc::new(CachedOracle::new(source, config.cache.ttl_seconds));
        run_report(&config, oracle, odds).await?
    } else {
        run_report(&config, Arc::new(source), odds).await?
    };

    // ── 7. Print the report ──────────────────────────────────
    let json = serde_json::to_string_pretty(&report)
        .context("Failed to serialize report")?;
    println!("{json}");

    info!("Run complete");
    Ok(())
}

/// Run the engine against the given oracle and record metrics.
async fn run_report<O: ProbabilityOracle>(
    config: &AppConfig,
    oracle: Arc<O>,
    odds: Arc<SnapshotSource>,
) -> Result<CliReport> {
    let fixtures = odds.fixtures().to_vec();
    if fixtures.is_empty() {
        warn!("Snapshot has no fixtures, report will be empty");
    }

    // ── 5. Engine run ────────────────────────────────────────
    let engine = RecommendationEngine::new(oracle, odds, config.engine.clone())
        .context("Engine configuration rejected")?;
    let deadline = config
        .bot
        .deadline_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));

    let report = engine
        .weekly_report(&fixtures, config.bot.bankroll, deadline)
        .await
        .context("Weekly report failed")?;

    info!(
        fixtures = report.fixtures,
        picks = report.picks.picks.len(),
        accumulators = report.accumulators.accumulators.len(),
        singles_stake = report.picks.summary.performance.total_stake,
        accumulator_stake = report.accumulators.summary.performance.total_stake,
        "Weekly report generated"
    );

    // ── 6. Metrics ───────────────────────────────────────────
    let metrics = if config.metrics.enabled {
        let metrics = EngineMetrics::new().context("Failed to create metrics registry")?;
        metrics.record_weekly(report.fixtures, &report.picks);
        metrics.record_accumulators(&report.accumulators);
        Some(metrics.render()?)
    } else {
        None
    };

    Ok(CliReport {
        run: config.bot.name.clone(),
        report,
        metrics,
    })
}
