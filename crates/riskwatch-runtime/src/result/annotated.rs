//! Scored transaction

use super::trace::RuleTrace;
use riskwatch_core::Transaction;
use serde::{Deserialize, Serialize};

/// A transaction plus the outcome of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    /// Matched rule IDs in evaluation order
    pub matched_rule_ids: Vec<String>,

    /// Sum of matched rule scores, capped at 100
    pub cumulative_score: u8,

    /// One entry per enabled rule considered, in snapshot order
    pub execution_trace: Vec<RuleTrace>,

    /// Registry generation of the snapshot used
    pub snapshot_generation: u64,
}

impl AnnotatedTransaction {
    /// Transaction ID
    pub fn id(&self) -> &str {
        &self.transaction.id
    }

    /// Returns true if the given rule matched
    pub fn matched_rule(&self, rule_id: &str) -> bool {
        self.matched_rule_ids.iter().any(|id| id == rule_id)
    }

    /// Trace entry for a rule, if it was considered
    pub fn trace_for(&self, rule_id: &str) -> Option<&RuleTrace> {
        self.execution_trace.iter().find(|t| t.rule_id == rule_id)
    }
}
