//! Core FraudEngine implementation

use super::types::SimulationReport;
use crate::builder::FraudEngineBuilder;
use crate::config::EngineConfig;
use crate::error::Result;
use chrono::Utc;
use riskwatch_core::{Rule, RuleSnapshot, Transaction};
use riskwatch_repository::{AuditEntry, AuditLog, RegistryState, RuleDraft, RulePatch, RuleRegistry, RuleStore};
use riskwatch_runtime::observability::names;
use riskwatch_runtime::storage::HIGH_RISK_THRESHOLD;
use riskwatch_runtime::{
    AnnotatedTransaction, CandidateRule, CountryStats, HistoryStats, HourlyBucket, Metrics,
    MetricsCollector, RiskBand, ScoringPipeline, SimulationEngine, SimulationSummary,
    TransactionFilter, TransactionHistory, UNNAMED_CANDIDATE,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;

/// Countries reported by [`FraudEngine::country_stats`]
const TOP_COUNTRIES: usize = 8;

/// Hours reported by [`FraudEngine::hourly_trend`]
const TREND_HOURS: usize = 12;

/// Fraud engine facade
///
/// Owns the rule registry, the scored-transaction history and the metrics
/// collector. All methods take `&self`; the engine can be shared across
/// threads behind an `Arc`.
pub struct FraudEngine {
    config: EngineConfig,
    registry: RuleRegistry,
    history: TransactionHistory,
    pipeline: ScoringPipeline,
    simulator: SimulationEngine,
    metrics: Arc<MetricsCollector>,
    store: Option<Arc<dyn RuleStore>>,
}

impl FraudEngine {
    /// Create an engine with an empty registry and no persistence
    pub fn new(config: EngineConfig) -> Self {
        let registry = RuleRegistry::new(config.audit_capacity);
        Self::from_parts(config, registry, None)
    }

    /// Start building an engine
    pub fn builder() -> FraudEngineBuilder {
        FraudEngineBuilder::new()
    }

    pub(crate) fn from_parts(
        config: EngineConfig,
        registry: RuleRegistry,
        store: Option<Arc<dyn RuleStore>>,
    ) -> Self {
        Self {
            history: TransactionHistory::new(config.history_capacity),
            pipeline: ScoringPipeline::new(),
            simulator: SimulationEngine::new(),
            metrics: Arc::new(MetricsCollector::new()),
            config,
            registry,
            store,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn audit_log(&self) -> &AuditLog {
        self.registry.audit()
    }

    // ========== Rule Administration ==========

    pub fn create_rule(&self, actor: &str, draft: RuleDraft) -> Result<Rule> {
        self.track(self.registry.create(actor, draft).map_err(Into::into))
    }

    pub fn update_rule(&self, actor: &str, id: &str, patch: RulePatch) -> Result<Rule> {
        self.track(self.registry.update(actor, id, patch).map_err(Into::into))
    }

    pub fn delete_rule(&self, actor: &str, id: &str) -> Result<()> {
        self.track(self.registry.delete(actor, id).map_err(Into::into))
    }

    pub fn toggle_rule(&self, actor: &str, id: &str) -> Result<Rule> {
        self.track(self.registry.toggle(actor, id).map_err(Into::into))
    }

    /// Current rule set, in creation order
    pub fn rules(&self) -> Arc<RuleSnapshot> {
        self.registry.snapshot()
    }

    pub fn rule(&self, id: &str) -> Option<Rule> {
        self.registry.get(id)
    }

    // ========== Scoring ==========

    /// Score a transaction against the current rule snapshot and record it
    pub fn score(&self, transaction: &Transaction) -> Arc<AnnotatedTransaction> {
        let start = Instant::now();
        let snapshot = self.registry.snapshot();
        let scored = self.pipeline.score(transaction, &snapshot);

        if self.config.enable_metrics {
            self.metrics.counter(names::TRANSACTIONS_SCORED).inc();
            self.metrics
                .counter(names::RULES_MATCHED)
                .add(scored.matched_rule_ids.len() as u64);
            if scored.cumulative_score > HIGH_RISK_THRESHOLD {
                self.metrics.counter(names::HIGH_RISK_TRANSACTIONS).inc();
            }
            self.metrics
                .histogram(names::CUMULATIVE_SCORE)
                .observe(f64::from(scored.cumulative_score));
            self.metrics
                .record_execution_time(names::SCORING, start.elapsed());
        }

        tracing::debug!(
            transaction_id = %scored.id(),
            cumulative_score = scored.cumulative_score,
            matched = scored.matched_rule_ids.len(),
            generation = scored.snapshot_generation,
            "Transaction scored"
        );

        self.history.record(scored)
    }

    pub fn recent_transactions(&self, n: usize) -> Vec<Arc<AnnotatedTransaction>> {
        self.history.recent(n)
    }

    pub fn query_transactions(&self, filter: &TransactionFilter) -> Vec<Arc<AnnotatedTransaction>> {
        self.history.query(filter)
    }

    pub fn stats(&self) -> HistoryStats {
        self.history.stats(Utc::now())
    }

    pub fn risk_distribution(&self) -> Vec<RiskBand> {
        self.history.risk_distribution()
    }

    /// The eight busiest countries in the retained history
    pub fn country_stats(&self) -> Vec<CountryStats> {
        self.history.country_stats(TOP_COUNTRIES)
    }

    /// Hourly activity for the latest twelve active hours of the last day
    pub fn hourly_trend(&self) -> Vec<HourlyBucket> {
        self.history.hourly_trend(Utc::now(), TREND_HOURS)
    }

    // ========== Simulation ==========

    /// Replay a candidate rule over the most recent scored transactions
    ///
    /// `window` is capped by the configured simulation window. A
    /// `rule_simulated` audit entry is written whether or not the candidate
    /// parses. Neither the registry nor the history is modified otherwise.
    pub fn simulate(&self, actor: &str, candidate: &JsonValue, window: usize) -> Result<SimulationReport> {
        let candidate = match CandidateRule::from_json(candidate) {
            Ok(parsed) => parsed,
            Err(err) => {
                let name = candidate
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .unwrap_or(UNNAMED_CANDIDATE);
                self.registry
                    .record_failed_simulation(actor, name, &err.to_string());
                return self.track(Err(err.into()));
            }
        };

        let window = window.min(self.config.simulation_window);
        let recent = self.history.recent(window);
        let results = self.simulator.simulate(
            &candidate,
            recent.iter().map(|scored| scored.as_ref()),
            window,
        );
        let summary = SimulationSummary::from_results(&results);

        self.registry
            .record_simulation(actor, &candidate.name, results.len());
        if self.config.enable_metrics {
            self.metrics.counter(names::SIMULATIONS_RUN).inc();
        }

        Ok(SimulationReport {
            candidate_name: candidate.name,
            candidate_score: candidate.score,
            results,
            summary,
        })
    }

    // ========== Persistence ==========

    /// Export registry state
    pub fn export(&self) -> RegistryState {
        self.registry.export()
    }

    /// Persist registry state; returns false when no store is configured
    pub async fn save(&self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let saved = store.save(&self.registry.export()).await.map_err(Into::into);
        self.track(saved).map(|()| true)
    }

    /// Most recent audit entries, newest first
    pub fn recent_audit(&self, n: usize) -> Vec<AuditEntry> {
        self.registry.audit().recent(n)
    }
}

impl FraudEngine {
    /// Count a failed operation under `errors_<kind>`
    fn track<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if self.config.enable_metrics {
                self.metrics.record_error(err.kind().as_str());
            }
        }
        result
    }
}

impl Default for FraudEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for FraudEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FraudEngine")
            .field("config", &self.config)
            .field("rules", &self.registry.len())
            .field("history", &self.history.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}
