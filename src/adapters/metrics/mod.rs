//! Metrics and Monitoring Adapters
//!
//! Prometheus counters and gauges for engine runs, rendered as text.

pub mod prometheus;

pub use prometheus::EngineMetrics;
