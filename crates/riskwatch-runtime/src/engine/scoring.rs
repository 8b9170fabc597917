//! Scoring pipeline
//!
//! Runs every enabled rule of a snapshot against one transaction and
//! aggregates the matched scores.

use super::evaluator::ConditionEvaluator;
use crate::result::{AnnotatedTransaction, RuleTrace};
use riskwatch_core::{RuleSnapshot, Transaction, MAX_RULE_SCORE};

/// Stateless scoring pipeline
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoringPipeline {
    evaluator: ConditionEvaluator,
}

impl ScoringPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a transaction against a rule snapshot.
    ///
    /// Disabled rules contribute nothing and leave no trace entry. The
    /// cumulative score is capped at 100. Never fails: malformed clauses were
    /// reduced to no-ops when the rule was parsed.
    pub fn score(&self, transaction: &Transaction, snapshot: &RuleSnapshot) -> AnnotatedTransaction {
        let mut total: u32 = 0;
        let mut matched_rule_ids = Vec::new();
        let mut execution_trace = Vec::with_capacity(snapshot.enabled_count());

        for rule in snapshot.iter().filter(|r| r.enabled) {
            let outcome = self.evaluator.evaluate(&rule.conditions, transaction);

            tracing::debug!(
                rule_id = %rule.id,
                transaction_id = %transaction.id,
                matched = outcome.matched,
                "Rule evaluated"
            );

            if outcome.matched {
                total = total.saturating_add(u32::from(rule.score));
                matched_rule_ids.push(rule.id.clone());
            }
            execution_trace.push(RuleTrace::new(rule, outcome));
        }

        AnnotatedTransaction {
            transaction: transaction.clone(),
            matched_rule_ids,
            cumulative_score: cap_score(total),
            execution_trace,
            snapshot_generation: snapshot.generation(),
        }
    }
}

/// Cap a running total at the maximum cumulative score
pub(crate) fn cap_score(total: u32) -> u8 {
    total.min(u32::from(MAX_RULE_SCORE)) as u8
}
