//! RiskWatch SDK
//!
//! High-level API for managing fraud rules, scoring live transactions and
//! trying candidate rules against recent history before committing them.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use riskwatch_sdk::{EngineConfig, FraudEngine, RuleDraft, Transaction};
//! use serde_json::json;
//!
//! let engine = FraudEngine::new(EngineConfig::default());
//! engine.create_rule(
//!     "admin",
//!     RuleDraft::new("High Amount", json!({"amount": {"$gt": 5000}}), 75, true),
//! )?;
//!
//! let scored = engine.score(&Transaction::new("txn_1", "user_1", 6000.0, "US", Utc::now()));
//! assert_eq!(scored.cumulative_score, 75);
//!
//! let report = engine.simulate(
//!     "analyst",
//!     &json!({"name": "US traffic", "conditions": {"country": {"$in": ["US"]}}, "score": 10}),
//!     100,
//! )?;
//! assert_eq!(report.summary.matched, 1);
//! # Ok::<(), riskwatch_sdk::SdkError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod fraud_engine;
pub mod telemetry;

// Re-export main types
pub use builder::FraudEngineBuilder;
pub use config::{EngineConfig, LogFormat};
pub use error::{ErrorKind, Result, SdkError};
pub use fraud_engine::{FraudEngine, SimulationReport};

// Re-export commonly used types from dependencies
pub use riskwatch_core::{Rule, RuleSnapshot, Transaction, Value};
pub use riskwatch_repository::{
    AuditAction, AuditEntry, AuditQuery, FileSystemRuleStore, MemoryRuleStore, RuleDraft,
    RulePatch, RuleStore,
};
pub use riskwatch_runtime::{
    AnnotatedTransaction, CountryStats, HistoryStats, HourlyBucket, Impact, Metrics,
    MetricsCollector, RiskBand, SimulationResult, SimulationSummary, TransactionFilter,
};
