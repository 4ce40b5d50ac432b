//! Prometheus Metrics Registry - Engine Observability
//!
//! Counts what each run evaluated, recommended and rejected. Metrics are
//! rendered in the Prometheus text format; exposing them over HTTP is
//! left to the host process.

use prometheus::{
    Encoder, Gauge, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::debug;

use crate::usecases::{AccumulatorReport, WeeklyPicks};

/// Centralized Prometheus metrics for the recommendation engine.
///
/// All metrics follow the naming convention `oddsiq_engine_*`.
pub struct EngineMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Fixtures run through the evaluator.
    pub fixtures_evaluated: IntCounter,
    /// Fixtures the oracle could not price.
    pub fixtures_unevaluable: IntCounter,
    /// Value outcomes found across all fixtures.
    pub value_bets: IntCounter,
    /// Weekly picks returned, by market.
    pub picks: IntCounterVec,
    /// Accumulators returned, by leg count.
    pub accumulators: IntCounterVec,
    /// Combinations enumerated before filtering.
    pub combinations_considered: IntCounter,
    /// Combinations rejected, by reason.
    pub combinations_rejected: IntCounterVec,
    /// Last portfolio scale factor (1 = unscaled).
    pub portfolio_scale_factor: Gauge,
    /// Last suggested total stake, by recommendation kind.
    pub total_stake: GaugeVec,
}

impl EngineMetrics {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let fixtures_evaluated = IntCounter::new(
            "oddsiq_engine_fixtures_evaluated_total",
            "Fixtures run through the outcome evaluator",
        )?;

        let fixtures_unevaluable = IntCounter::new(
            "oddsiq_engine_fixtures_unevaluable_total",
            "Fixtures skipped because the oracle returned no prediction",
        )?;

        let value_bets = IntCounter::new(
            "oddsiq_engine_value_bets_total",
            "Outcomes with EV at or above the value threshold",
        )?;

        let picks = IntCounterVec::new(
            Opts::new("oddsiq_engine_picks_total", "Weekly picks returned"),
            &["market"],
        )?;

        let accumulators = IntCounterVec::new(
            Opts::new(
                "oddsiq_engine_accumulators_total",
                "Accumulators returned",
            ),
            &["legs"],
        )?;

        let combinations_considered = IntCounter::new(
            "oddsiq_engine_combinations_considered_total",
            "Leg combinations enumerated before filtering",
        )?;

        let combinations_rejected = IntCounterVec::new(
            Opts::new(
                "oddsiq_engine_combinations_rejected_total",
                "Leg combinations rejected",
            ),
            &["reason"],
        )?;

        let portfolio_scale_factor = Gauge::new(
            "oddsiq_engine_portfolio_scale_factor",
            "Scale applied to accumulator stakes by the portfolio cap",
        )?;

        let total_stake = GaugeVec::new(
            Opts::new(
                "oddsiq_engine_total_stake",
                "Total suggested stake of the last run",
            ),
            &["kind"],
        )?;

        // Register all metrics
        registry.register(Box::new(fixtures_evaluated.clone()))?;
        registry.register(Box::new(fixtures_unevaluable.clone()))?;
        registry.register(Box::new(value_bets.clone()))?;
        registry.register(Box::new(picks.clone()))?;
        registry.register(Box::new(accumulators.clone()))?;
        registry.register(Box::new(combinations_considered.clone()))?;
        registry.register(Box::new(combinations_rejected.clone()))?;
        registry.register(Box::new(portfolio_scale_factor.clone()))?;
        registry.register(Box::new(total_stake.clone()))?;

        Ok(Self {
            registry,
            fixtures_evaluated,
            fixtures_unevaluable,
            value_bets,
            picks,
            accumulators,
            combinations_considered,
            combinations_rejected,
            portfolio_scale_factor,
            total_stake,
        })
    }

    /// Record a weekly pick run over `fixtures` evaluated fixtures.
    pub fn record_weekly(&self, fixtures: usize, weekly: &WeeklyPicks) {
        self.fixtures_evaluated.inc_by(fixtures as u64);
        self.fixtures_unevaluable
            .inc_by(weekly.unevaluable.len() as u64);
        self.value_bets.inc_by(weekly.summary.total_value_bets as u64);

        for pick in &weekly.picks {
            self.picks
                .with_label_values(&[pick.outcome.market.as_str()])
                .inc();
        }
        self.total_stake
            .with_label_values(&["singles"])
            .set(weekly.summary.performance.total_stake);
    }

    /// Record an accumulator run.
    pub fn record_accumulators(&self, report: &AccumulatorReport) {
        let stats = &report.stats;
        self.combinations_considered
            .inc_by(stats.combinations_considered);
        self.combinations_rejected
            .with_label_values(&["correlated"])
            .inc_by(stats.rejected_correlated);
        self.combinations_rejected
            .with_label_values(&["non_positive_stake"])
            .inc_by(stats.rejected_non_positive_stake);
        self.combinations_rejected
            .with_label_values(&["below_min_ev"])
            .inc_by(stats.rejected_below_min_ev);

        for acc in &report.accumulators {
            self.accumulators
                .with_label_values(&[acc.num_legs.to_string().as_str()])
                .inc();
        }
        self.portfolio_scale_factor.set(stats.scale_factor);
        self.total_stake
            .with_label_values(&["accumulators"])
            .set(report.summary.performance.total_stake);
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        debug!(bytes = buffer.len(), "Metrics rendered");
        Ok(String::from_utf8(buffer)?)
    }
}
