//! Unit tests for condition trees and rule snapshots
//!
//! Tests the core data structures shared by the registry and the evaluator

use chrono::{TimeZone, Utc};
use riskwatch_core::condition::Operator;
use riskwatch_core::{Clause, ConditionParser, ConditionSet, Rule, RuleSnapshot, Transaction, Value};
use serde_json::json;

// =============================================================================
// Condition Parsing Tests
// =============================================================================

#[test]
fn test_parse_full_document() {
    let set = ConditionParser::new()
        .parse(&json!({
            "amount": {"$gt": 1000, "$lt": 9000},
            "country": {"$nin": ["US", "CA"]},
            "userId": {"$regex": "^user_"}
        }))
        .unwrap();

    assert_eq!(set.fields().len(), 3);
    assert_eq!(set.active_clause_count(), 3);

    let fields: Vec<_> = set.fields().iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["amount", "country", "userId"]);
}

#[test]
fn test_single_bound_range() {
    let set = ConditionParser::new()
        .parse(&json!({"amount": {"$lt": 50}}))
        .unwrap();

    assert_eq!(
        set.fields()[0].clauses,
        vec![Clause::Range {
            gt: None,
            lt: Some(50.0)
        }]
    );
}

#[test]
fn test_membership_keeps_mixed_operands() {
    let set = ConditionParser::new()
        .parse(&json!({"amount": {"$in": [100, "100", null]}}))
        .unwrap();

    match &set.fields()[0].clauses[0] {
        Clause::Membership { include, exclude } => {
            assert_eq!(
                include.as_deref(),
                Some(&[Value::Number(100.0), Value::from("100"), Value::Null][..])
            );
            assert!(exclude.is_none());
        }
        other => panic!("Expected Membership, got {:?}", other),
    }
}

#[test]
fn test_operator_keys() {
    for key in ["$gt", "$lt", "$in", "$nin", "$regex"] {
        let op = Operator::from_key(key).unwrap();
        assert_eq!(op.as_key(), key);
        assert_eq!(op.to_string(), key);
    }
    assert!(Operator::from_key("$eq").is_none());
    assert!(Operator::from_key("gt").is_none());
}

#[test]
fn test_condition_set_deserializes_from_rule_json() {
    let rule: Rule = serde_json::from_value(json!({
        "id": "rule_3",
        "name": "Rapid Transaction Pattern",
        "enabled": false,
        "conditions": {"amount": {"$gt": 1000}, "userId": {"$regex": "^user_"}},
        "score": 60,
        "version": 2,
        "createdAt": "2024-03-01T12:00:00Z",
        "updatedAt": "2024-03-01T12:05:00Z"
    }))
    .unwrap();

    assert_eq!(rule.conditions.active_clause_count(), 2);
    assert!(!rule.enabled);
    assert_eq!(rule.version, 2);
}

#[test]
fn test_condition_set_rejects_non_object_json() {
    let result: Result<ConditionSet, _> = serde_json::from_value(json!([1, 2, 3]));
    assert!(result.is_err());
}

// =============================================================================
// Transaction Field Tests
// =============================================================================

#[test]
fn test_transaction_fields() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let txn = Transaction::new("txn_1", "user_7", 6000.0, "NG", at);

    assert_eq!(txn.field("amount"), Some(Value::Number(6000.0)));
    assert_eq!(txn.field("userId"), Some(Value::from("user_7")));
    assert_eq!(txn.field("user_id"), Some(Value::from("user_7")));
    assert_eq!(txn.field("country"), Some(Value::from("NG")));
    assert!(txn.field("merchant").is_none());
}

#[test]
fn test_transaction_json_shape() {
    let txn: Transaction = serde_json::from_value(json!({
        "id": "txn_9",
        "userId": "user_1",
        "amount": 42.5,
        "country": "US",
        "timestamp": "2024-03-01T12:00:00.000Z"
    }))
    .unwrap();

    assert_eq!(txn.user_id, "user_1");
    assert_eq!(txn.amount, 42.5);
    assert_eq!(txn.field("timestamp"), Some(Value::from("2024-03-01T12:00:00.000Z")));
}

// =============================================================================
// Snapshot Tests
// =============================================================================

#[test]
fn test_snapshot_preserves_creation_order() {
    let rules = vec![
        Rule::new("rule_2", "b", ConditionSet::empty(), 10),
        Rule::new("rule_1", "a", ConditionSet::empty(), 20).with_enabled(false),
    ];
    let snapshot = RuleSnapshot::from_rules(4, rules);

    let ids: Vec<_> = snapshot.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["rule_2", "rule_1"]);
    assert_eq!(snapshot.enabled_count(), 1);
    assert_eq!(snapshot.generation(), 4);
    assert!(snapshot.get("rule_1").is_some());
}
