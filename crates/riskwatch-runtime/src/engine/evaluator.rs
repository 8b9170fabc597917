//! Condition evaluation
//!
//! Pure and lock-free: a condition tree is read-only once its rule version
//! is published, so any number of evaluations may share it.

use super::operators::{execute_gt, execute_in, execute_lt, execute_not_in, execute_regex};
use crate::result::ConditionOutcome;
use riskwatch_core::condition::{Clause, Operator};
use riskwatch_core::{ConditionSet, Transaction, Value};

/// Evaluates condition trees against transactions
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a condition tree.
    ///
    /// Clauses that do not apply (unknown field, value of the wrong type,
    /// no-op clause) are skipped and left out of the details.
    pub fn evaluate(&self, conditions: &ConditionSet, transaction: &Transaction) -> ConditionOutcome {
        let mut outcome = ConditionOutcome::vacuous();

        for field in conditions.fields() {
            let Some(value) = transaction.field(&field.field) else {
                tracing::debug!("Field '{}' not present on transaction, skipping", field.field);
                continue;
            };

            for clause in &field.clauses {
                evaluate_clause(&field.field, clause, &value, &mut outcome);
            }
        }

        outcome
    }
}

/// Evaluate a condition tree with the default evaluator
pub fn evaluate(conditions: &ConditionSet, transaction: &Transaction) -> ConditionOutcome {
    ConditionEvaluator::new().evaluate(conditions, transaction)
}

fn evaluate_clause(field: &str, clause: &Clause, value: &Value, outcome: &mut ConditionOutcome) {
    let mut record = |op: Operator, held: Option<bool>| {
        if let Some(held) = held {
            outcome.record(format!("{}.{}", field, op), held);
        }
    };

    match clause {
        Clause::Range { gt, lt } => {
            if let Some(bound) = gt {
                record(Operator::Gt, execute_gt(value, *bound));
            }
            if let Some(bound) = lt {
                record(Operator::Lt, execute_lt(value, *bound));
            }
        }
        Clause::Membership { include, exclude } => {
            if let Some(set) = include {
                record(Operator::In, execute_in(value, set));
            }
            if let Some(set) = exclude {
                record(Operator::NotIn, execute_not_in(value, set));
            }
        }
        Clause::Pattern(pattern) => record(Operator::Regex, execute_regex(value, pattern)),
        Clause::Noop { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskwatch_core::ConditionParser;
    use serde_json::json;

    fn txn(amount: f64, country: &str, user_id: &str) -> Transaction {
        Transaction::new("txn_1", user_id, amount, country, Utc::now())
    }

    fn conditions(doc: serde_json::Value) -> ConditionSet {
        ConditionParser::new().parse(&doc).unwrap()
    }

    #[test]
    fn test_high_amount_matches() {
        let outcome = evaluate(&conditions(json!({"amount": {"$gt": 5000}})), &txn(6000.0, "US", "user_1"));

        assert!(outcome.matched);
        assert_eq!(outcome.details.get("amount.$gt"), Some(&true));
    }

    #[test]
    fn test_blocked_country_misses() {
        let outcome = evaluate(
            &conditions(json!({"country": {"$in": ["RU", "NG", "IR"]}})),
            &txn(10.0, "US", "user_1"),
        );

        assert!(!outcome.matched);
        assert_eq!(outcome.details.get("country.$in"), Some(&false));
    }

    #[test]
    fn test_range_bounds_evaluated_independently() {
        let set = conditions(json!({"amount": {"$gt": 1000, "$lt": 2000}}));

        let inside = evaluate(&set, &txn(1500.0, "US", "u"));
        assert!(inside.matched);
        assert_eq!(inside.details.len(), 2);

        let above = evaluate(&set, &txn(2500.0, "US", "u"));
        assert!(!above.matched);
        assert_eq!(above.details.get("amount.$gt"), Some(&true));
        assert_eq!(above.details.get("amount.$lt"), Some(&false));
    }

    #[test]
    fn test_and_across_fields() {
        let set = conditions(json!({
            "amount": {"$gt": 1000},
            "userId": {"$regex": "^user_"}
        }));

        assert!(evaluate(&set, &txn(1500.0, "US", "user_7")).matched);
        assert!(!evaluate(&set, &txn(1500.0, "US", "merchant_7")).matched);
        assert!(!evaluate(&set, &txn(500.0, "US", "user_7")).matched);
    }

    #[test]
    fn test_nin() {
        let set = conditions(json!({"country": {"$nin": ["US", "CA"]}}));
        assert!(evaluate(&set, &txn(1.0, "DE", "u")).matched);
        assert!(!evaluate(&set, &txn(1.0, "CA", "u")).matched);
    }

    #[test]
    fn test_empty_conditions_match() {
        let outcome = evaluate(&ConditionSet::empty(), &txn(1.0, "US", "u"));
        assert!(outcome.matched);
        assert!(outcome.details.is_empty());
    }

    #[test]
    fn test_inapplicable_clauses_are_skipped() {
        // Unknown operator, unknown field, and a numeric bound on a string field
        let set = conditions(json!({
            "amount": {"$eq": 5},
            "merchant": {"$in": ["acme"]},
            "country": {"$gt": 10}
        }));

        let outcome = evaluate(&set, &txn(1.0, "US", "u"));
        assert!(outcome.matched);
        assert!(outcome.details.is_empty());
    }

    #[test]
    fn test_zero_threshold_is_a_real_bound() {
        let set = conditions(json!({"amount": {"$gt": 0}}));
        assert!(!evaluate(&set, &txn(0.0, "US", "u")).matched);
        assert!(evaluate(&set, &txn(0.01, "US", "u")).matched);
    }
}
