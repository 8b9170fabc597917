//! Rule simulation demo
//!
//! This demo shows:
//! - Building up scored history against the live rules
//! - Replaying a candidate rule over the most recent transactions
//! - Rejected candidates still leaving an audit entry
//! - Committing the candidate once the report looks right

use chrono::{Duration, Utc};
use riskwatch_sdk::{AuditQuery, EngineConfig, FraudEngine, RuleDraft, Transaction};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Rule Simulation Demo ===\n");

    let engine = FraudEngine::new(EngineConfig::default().with_simulation_window(100));

    engine.create_rule(
        "admin",
        RuleDraft::new("High Amount Transaction", json!({"amount": {"$gt": 5000}}), 75, true),
    )?;
    engine.create_rule(
        "admin",
        RuleDraft::new(
            "Blocked Country Transaction",
            json!({"country": {"$in": ["RU", "NG", "IR"]}}),
            90,
            true,
        ),
    )?;

    let start = Utc::now() - Duration::minutes(10);
    let samples = [
        (250.0, "US"),
        (2400.0, "US"),
        (7200.0, "CA"),
        (3100.0, "DE"),
        (450.0, "NG"),
        (9800.0, "RU"),
        (2050.0, "JP"),
        (120.0, "UK"),
    ];
    for (i, (amount, country)) in samples.iter().enumerate() {
        let txn = Transaction::new(
            format!("txn_{}", i + 1),
            format!("user_{}", i % 3 + 1),
            *amount,
            *country,
            start + Duration::seconds(i as i64 * 30),
        );
        engine.score(&txn);
    }

    // Candidate: mid-sized transactions outside North America
    let candidate = json!({
        "name": "Mid Amount Abroad",
        "conditions": {
            "amount": {"$gt": 2000, "$lt": 5000},
            "country": {"$nin": ["US", "CA"]}
        },
        "score": 45
    });

    let report = engine.simulate("analyst", &candidate, 100)?;
    println!(
        "Candidate '{}' (+{}) tested on {} transactions",
        report.candidate_name,
        report.candidate_score,
        report.sample_size()
    );
    for result in &report.results {
        println!(
            "  {:<6} {:>8.2} {}  {:>3} -> {:>3}  {:?}",
            result.transaction.id,
            result.transaction.amount,
            result.transaction.country,
            result.original_score,
            result.new_score,
            result.impact
        );
    }
    println!(
        "Matched: {}, increased: {}, average delta: {}\n",
        report.summary.matched, report.summary.increased, report.summary.average_delta
    );

    // A malformed candidate is rejected but still audited
    match engine.simulate("analyst", &json!({"name": "Typo", "conditions": ["amount"]}), 100) {
        Ok(_) => println!("Unexpectedly accepted malformed candidate"),
        Err(e) => println!("Rejected ({:?}): {}\n", e.kind(), e),
    }

    if report.summary.matched > 0 {
        let rule = engine.create_rule(
            "analyst",
            RuleDraft::new(report.candidate_name.clone(), candidate["conditions"].clone(), 45, true),
        )?;
        println!("Committed as {} (version {})\n", rule.id, rule.version);
    }

    println!("--- Audit Log ---");
    for entry in engine.audit_log().query(&AuditQuery::new()) {
        println!(
            "#{:<3} {} {:<8} {:<15} {}",
            entry.sequence,
            entry.timestamp.format("%H:%M:%S"),
            entry.actor,
            entry.action,
            entry.details
        );
    }

    Ok(())
}
