//! Integration tests for the scoring pipeline and simulation engine

use chrono::{TimeZone, Utc};
use riskwatch_core::{ConditionParser, Rule, RuleSnapshot, Transaction};
use riskwatch_runtime::{
    CandidateRule, Impact, ScoringPipeline, SimulationEngine, SimulationSummary,
    TransactionHistory,
};
use serde_json::{json, Value as JsonValue};

fn rule(id: &str, conditions: JsonValue, score: u8) -> Rule {
    let conditions = ConditionParser::new().parse(&conditions).unwrap();
    Rule::new(id, id, conditions, score)
}

fn transaction(id: &str, amount: f64, country: &str) -> Transaction {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    Transaction::new(id, "user_42", amount, country, at)
}

#[test]
fn test_single_threshold_rule_matches() {
    let snapshot = RuleSnapshot::from_rules(1, vec![rule("rule_1", json!({"amount": {"$gt": 5000}}), 75)]);

    let scored = ScoringPipeline::new().score(&transaction("t1", 6000.0, "US"), &snapshot);

    assert_eq!(scored.cumulative_score, 75);
    assert_eq!(scored.matched_rule_ids, vec!["rule_1"]);
    assert!(scored.execution_trace[0].matched);
    assert_eq!(scored.execution_trace[0].details.get("amount.$gt"), Some(&true));
}

#[test]
fn test_regex_sees_timestamp_as_ingested() {
    let snapshot = RuleSnapshot::from_rules(
        1,
        vec![
            rule("rule_1", json!({"timestamp": {"$regex": "12:00:00Z$"}}), 20),
            rule("rule_2", json!({"timestamp": {"$regex": "\\+02:00$"}}), 30),
        ],
    );
    let pipeline = ScoringPipeline::new();

    let utc: Transaction = serde_json::from_value(json!({
        "id": "t1", "userId": "u1", "amount": 10.0, "country": "US",
        "timestamp": "2024-05-01T12:00:00Z"
    }))
    .unwrap();
    let scored = pipeline.score(&utc, &snapshot);
    assert_eq!(scored.matched_rule_ids, vec!["rule_1"]);
    assert_eq!(scored.execution_trace[0].details.get("timestamp.$regex"), Some(&true));

    let offset: Transaction = serde_json::from_value(json!({
        "id": "t2", "userId": "u2", "amount": 10.0, "country": "US",
        "timestamp": "2024-05-01T14:00:00+02:00"
    }))
    .unwrap();
    let scored = pipeline.score(&offset, &snapshot);
    assert_eq!(scored.matched_rule_ids, vec!["rule_2"]);
    assert_eq!(scored.cumulative_score, 30);
}

#[test]
fn test_cumulative_score_is_clamped() {
    let snapshot = RuleSnapshot::from_rules(
        1,
        vec![
            rule("rule_1", json!({"amount": {"$gt": 5000}}), 75),
            rule("rule_2", json!({"country": {"$in": ["RU", "NG", "IR"]}}), 90),
        ],
    );

    let scored = ScoringPipeline::new().score(&transaction("t1", 6000.0, "NG"), &snapshot);

    assert_eq!(scored.cumulative_score, 100);
    assert_eq!(scored.matched_rule_ids, vec!["rule_1", "rule_2"]);
}

#[test]
fn test_many_matching_rules_stay_within_bounds() {
    let rules = (0..50).map(|i| rule(&format!("rule_{}", i), json!({}), 100));
    let snapshot = RuleSnapshot::from_rules(1, rules);

    let scored = ScoringPipeline::new().score(&transaction("t1", 1.0, "US"), &snapshot);

    assert_eq!(scored.cumulative_score, 100);
    assert_eq!(scored.matched_rule_ids.len(), 50);
    assert_eq!(scored.execution_trace.len(), 50);
}

#[test]
fn test_non_member_country_does_not_match() {
    let snapshot = RuleSnapshot::from_rules(
        1,
        vec![rule("rule_2", json!({"country": {"$in": ["RU", "NG", "IR"]}}), 90)],
    );

    let scored = ScoringPipeline::new().score(&transaction("t1", 10.0, "US"), &snapshot);

    assert_eq!(scored.cumulative_score, 0);
    assert!(!scored.matched_rule("rule_2"));
    assert!(!scored.trace_for("rule_2").unwrap().matched);
}

#[test]
fn test_disabled_rules_leave_no_trace() {
    let snapshot = RuleSnapshot::from_rules(
        1,
        vec![
            rule("rule_1", json!({}), 40).with_enabled(false),
            rule("rule_2", json!({}), 10),
        ],
    );

    let scored = ScoringPipeline::new().score(&transaction("t1", 10.0, "US"), &snapshot);

    assert_eq!(scored.cumulative_score, 10);
    assert!(scored.trace_for("rule_1").is_none());
    assert!(!scored.matched_rule("rule_1"));
    assert_eq!(scored.execution_trace.len(), 1);
}

#[test]
fn test_malformed_rule_does_not_block_others() {
    let snapshot = RuleSnapshot::from_rules(
        1,
        vec![
            rule("rule_1", json!({"amount": {"$between": [1, 2]}, "userId": {"$regex": "(("}}), 30),
            rule("rule_2", json!({"amount": {"$gt": 100}}), 20),
        ],
    );

    let scored = ScoringPipeline::new().score(&transaction("t1", 500.0, "US"), &snapshot);

    // rule_1 reduced to no-ops, so it matches vacuously
    assert_eq!(scored.matched_rule_ids, vec!["rule_1", "rule_2"]);
    assert!(scored.trace_for("rule_1").unwrap().details.is_empty());
    assert_eq!(scored.cumulative_score, 50);
}

#[test]
fn test_scoring_is_idempotent() {
    let snapshot = RuleSnapshot::from_rules(
        3,
        vec![
            rule("rule_1", json!({"amount": {"$gt": 1000, "$lt": 9000}}), 30),
            rule("rule_2", json!({"userId": {"$regex": "^user_"}}), 15),
        ],
    );
    let pipeline = ScoringPipeline::new();
    let txn = transaction("t1", 4000.0, "US");

    let first = pipeline.score(&txn, &snapshot);
    let second = pipeline.score(&txn, &snapshot);

    assert_eq!(first, second);
    assert_eq!(first.snapshot_generation, 3);
}

#[test]
fn test_simulation_does_not_affect_scoring() {
    let snapshot = RuleSnapshot::from_rules(1, vec![rule("rule_1", json!({"amount": {"$gt": 5000}}), 75)]);
    let pipeline = ScoringPipeline::new();
    let history = TransactionHistory::default();

    for (i, amount) in [100.0, 6000.0, 9000.0].into_iter().enumerate() {
        history.record(pipeline.score(&transaction(&format!("t{}", i), amount, "US"), &snapshot));
    }

    let sample = transaction("sample", 7000.0, "RU");
    let before = pipeline.score(&sample, &snapshot);

    let candidate = CandidateRule::from_json(&json!({
        "name": "Russia",
        "conditions": {"country": {"$nin": ["US"]}},
        "score": 50
    }))
    .unwrap();
    let recent = history.recent(100);
    let results = SimulationEngine::new().simulate(&candidate, recent.iter().map(|s| s.as_ref()), 100);
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.matched));

    let after = pipeline.score(&sample, &snapshot);
    assert_eq!(before, after);
    assert_eq!(history.len(), 3);
    assert_eq!(snapshot.len(), 1);
}

#[test]
fn test_simulation_over_recent_history() {
    let snapshot = RuleSnapshot::from_rules(1, vec![rule("rule_1", json!({"amount": {"$gt": 5000}}), 75)]);
    let pipeline = ScoringPipeline::new();
    let history = TransactionHistory::default();

    for (i, amount) in [6000.0, 2500.0, 100.0, 8000.0].into_iter().enumerate() {
        history.record(pipeline.score(&transaction(&format!("t{}", i), amount, "US"), &snapshot));
    }

    let candidate = CandidateRule::from_json(&json!({
        "name": "Mid Amount",
        "conditions": {"amount": {"$gt": 2000}},
        "score": 45
    }))
    .unwrap();
    let recent = history.recent(3);
    let results = SimulationEngine::new().simulate(&candidate, recent.iter().map(|s| s.as_ref()), 100);

    // newest first: t3 (8000), t2 (100), t1 (2500)
    let ids: Vec<_> = results.iter().map(|r| r.transaction.id.as_str()).collect();
    assert_eq!(ids, vec!["t3", "t2", "t1"]);

    assert_eq!(results[0].original_score, 75);
    assert_eq!(results[0].new_score, 100);
    assert_eq!(results[1].impact, Impact::NoChange);
    assert_eq!(results[2].new_score, 45);

    let summary = SimulationSummary::from_results(&results);
    assert_eq!(summary.total_tested, 3);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.increased, 2);
    assert_eq!(summary.decreased, 0);
    assert_eq!(summary.average_delta, 23);
}
