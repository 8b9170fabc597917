//! Live scoring demo
//!
//! This demo shows:
//! - Loading configuration and installing tracing
//! - Seeding the registry with a few fraud rules
//! - Scoring a stream of generated transactions from concurrent tasks
//! - Toggling a rule mid-stream without pausing scoring
//! - Reading history statistics and metrics afterwards

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use riskwatch_sdk::telemetry::{init_tracing, DEFAULT_FILTER};
use riskwatch_sdk::{
    EngineConfig, FraudEngine, FraudEngineBuilder, Metrics, RuleDraft, Transaction,
    TransactionFilter,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const COUNTRIES: [&str; 8] = ["US", "CA", "UK", "RU", "NG", "DE", "FR", "JP"];

fn generate_transaction(seq: usize) -> Transaction {
    let mut rng = rand::thread_rng();
    let amount = rng.gen_range(100.0..10_100.0);
    let country = COUNTRIES.choose(&mut rng).copied().unwrap_or("US");
    let user = format!("user_{}", rng.gen_range(1..=100));

    Transaction::new(format!("txn_{:05}", seq), user, amount, country, Utc::now())
}

fn seed_rules(engine: &FraudEngine, actor: &str) -> anyhow::Result<()> {
    engine.create_rule(
        actor,
        RuleDraft::new(
            "High Amount Transaction",
            json!({"amount": {"$gt": 5000}}),
            75,
            true,
        ),
    )?;
    engine.create_rule(
        actor,
        RuleDraft::new(
            "Blocked Country Transaction",
            json!({"country": {"$in": ["RU", "NG", "IR"]}}),
            90,
            true,
        ),
    )?;
    engine.create_rule(
        actor,
        RuleDraft::new(
            "Rapid Transaction Pattern",
            json!({"amount": {"$gt": 1000}, "userId": {"$regex": "^user_"}}),
            60,
            false,
        ),
    )?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EngineConfig::load()?;
    init_tracing(DEFAULT_FILTER, config.log_format)?;
    let actor = config.default_actor.clone();

    println!("=== Live Scoring Demo ===\n");

    let engine = Arc::new(FraudEngineBuilder::new().with_config(config).build().await?);
    if engine.rules().is_empty() {
        seed_rules(&engine, &actor)?;
    }
    println!("Rules loaded: {}\n", engine.rules().len());

    // Four producers, ten transactions per second each
    let mut producers = Vec::new();
    for worker in 0..4 {
        let engine = engine.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..50 {
                let scored = engine.score(&generate_transaction(worker * 1000 + i));
                if scored.cumulative_score >= 90 {
                    tracing::info!(
                        transaction_id = %scored.id(),
                        score = scored.cumulative_score,
                        rules = ?scored.matched_rule_ids,
                        "High risk transaction"
                    );
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }));
    }

    // Flip a disabled rule on while traffic is flowing
    tokio::time::sleep(Duration::from_secs(2)).await;
    let dormant = engine.rules().iter().find(|r| !r.enabled).map(|r| r.id.clone());
    if let Some(id) = dormant {
        let toggled = engine.toggle_rule(&actor, &id)?;
        println!(
            "Toggled '{}' -> enabled={} (version {})\n",
            toggled.name, toggled.enabled, toggled.version
        );
    }

    for producer in producers {
        producer.await?;
    }

    let stats = engine.stats();
    println!("--- History ---");
    println!("Processed: {}", stats.total_processed);
    println!("Average score: {}", stats.average_score);
    println!("High risk: {}", stats.high_risk);
    for band in engine.risk_distribution() {
        println!("  {:>3}-{:<3} {}", band.min, band.max, band.count);
    }

    println!("Top countries:");
    for country in engine.country_stats() {
        println!(
            "  {:<3} {:>5} txns, avg score {}",
            country.country, country.transactions, country.average_score
        );
    }

    let blocked = engine.query_transactions(&TransactionFilter::new().with_rule_id("rule_2"));
    println!("Matched 'Blocked Country': {}", blocked.len());

    let metrics = engine.metrics();
    let scoring = metrics.histogram("scoring_duration");
    println!("\n--- Metrics ---");
    println!("Scored: {}", metrics.counter("transactions_scored").get());
    println!("Rule matches: {}", metrics.counter("rules_matched").get());
    println!(
        "Scoring time: avg {:.3}ms, p99 {:.3}ms",
        scoring.avg() * 1000.0,
        scoring.percentile(99.0) * 1000.0
    );

    if engine.save().await? {
        println!("\nRule state saved");
    }

    Ok(())
}
