//! RiskWatch Core - Core types and definitions for the RiskWatch rule engine
//!
//! This crate provides the fundamental types used across the RiskWatch crates:
//! - Value types for transaction fields and condition operands
//! - Transaction and rule definitions
//! - Condition trees and the condition parser
//! - Rule snapshots shared between the registry and the scoring pipeline
//! - Error types

pub mod condition;
pub mod error;
pub mod rule;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use condition::{Clause, ConditionParser, ConditionSet, FieldCondition, Pattern};
pub use error::CoreError;
pub use rule::{Rule, RuleId, MAX_RULE_SCORE};
pub use snapshot::RuleSnapshot;
pub use types::{Transaction, Value};
