//! Observability module
//!
//! In-process counters and histograms for the scoring path.

pub mod metrics;

pub use metrics::{Counter, Histogram, Metrics, MetricsCollector};

/// Metric names recorded by the engine
pub mod names {
    pub const TRANSACTIONS_SCORED: &str = "transactions_scored";
    pub const RULES_MATCHED: &str = "rules_matched";
    pub const HIGH_RISK_TRANSACTIONS: &str = "high_risk_transactions";
    pub const SIMULATIONS_RUN: &str = "simulations_run";
    pub const SCORING: &str = "scoring";
    pub const CUMULATIVE_SCORE: &str = "cumulative_score";
}
