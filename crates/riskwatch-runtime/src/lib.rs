//! RiskWatch Runtime - Evaluation engine for RiskWatch rules
//!
//! This crate evaluates transactions against rule snapshots, replays
//! candidate rules over scored history, and keeps the bounded history
//! those replays draw from.

pub mod engine;
pub mod error;
pub mod observability;
pub mod result;
pub mod storage;

// Re-export main types
pub use engine::{
    CandidateRule, ConditionEvaluator, ScoringPipeline, SimulationEngine, UNNAMED_CANDIDATE,
};
pub use error::{Result, RuntimeError};
pub use observability::{Counter, Histogram, Metrics, MetricsCollector};
pub use result::{
    AnnotatedTransaction, ConditionOutcome, Impact, RuleTrace, SimulationResult,
    SimulationSummary,
};
pub use storage::{
    CountryStats, HistoryStats, HourlyBucket, RiskBand, TransactionFilter, TransactionHistory,
};
