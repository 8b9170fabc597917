//! Execution tracing types for rule debugging
//!
//! These structures capture which rules were considered for a transaction
//! and which of their clauses held.

use riskwatch_core::Rule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of evaluating one condition tree against one transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionOutcome {
    /// Logical AND of every evaluated clause (true when none were evaluated)
    pub matched: bool,

    /// Per evaluated clause, keyed `<field>.<operator>`
    pub details: BTreeMap<String, bool>,
}

impl ConditionOutcome {
    /// Outcome of an empty or fully inapplicable condition tree
    pub fn vacuous() -> Self {
        Self {
            matched: true,
            details: BTreeMap::new(),
        }
    }

    /// Record one clause result
    pub fn record(&mut self, key: String, held: bool) {
        self.matched &= held;
        self.details.insert(key, held);
    }
}

/// Trace of a single rule evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTrace {
    /// The rule ID
    pub rule_id: String,

    /// The rule name at evaluation time
    pub rule_name: String,

    /// Rule version the evaluation used
    pub rule_version: u64,

    /// Whether the rule matched
    pub matched: bool,

    /// Clause-level results
    pub details: BTreeMap<String, bool>,
}

impl RuleTrace {
    /// Create a rule trace from an evaluation outcome
    pub fn new(rule: &Rule, outcome: ConditionOutcome) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            rule_version: rule.version,
            matched: outcome.matched,
            details: outcome.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_record_is_and() {
        let mut outcome = ConditionOutcome::vacuous();
        assert!(outcome.matched);

        outcome.record("amount.$gt".to_string(), true);
        assert!(outcome.matched);

        outcome.record("country.$in".to_string(), false);
        assert!(!outcome.matched);
        assert_eq!(outcome.details.len(), 2);
    }
}
