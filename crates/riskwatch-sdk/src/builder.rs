//! Builder pattern for FraudEngine

use crate::config::{EngineConfig, LogFormat};
use crate::error::Result;
use crate::fraud_engine::FraudEngine;
use riskwatch_repository::{FileSystemRuleStore, RuleRegistry, RuleStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for FraudEngine
///
/// # Example
///
/// ```no_run
/// use riskwatch_sdk::FraudEngineBuilder;
///
/// # #[tokio::main]
/// # async fn main() -> riskwatch_sdk::Result<()> {
/// // Restore rules from disk if the file exists
/// let engine = FraudEngineBuilder::new()
///     .with_rule_store_path("state/rules.json")
///     .with_simulation_window(50)
///     .build()
///     .await?;
///
/// engine.save().await?;
/// # Ok(())
/// # }
/// ```
pub struct FraudEngineBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn RuleStore>>,
}

impl FraudEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            store: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.config.audit_capacity = capacity;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    pub fn with_simulation_window(mut self, window: usize) -> Self {
        self.config.simulation_window = window;
        self
    }

    pub fn with_default_actor(mut self, actor: impl Into<String>) -> Self {
        self.config.default_actor = actor.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.log_format = format;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Use a custom store for loading and saving registry state
    ///
    /// Takes precedence over a configured rule store path.
    pub fn with_rule_store(mut self, store: Arc<dyn RuleStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persist registry state in a JSON or YAML file
    pub fn with_rule_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rule_store = Some(path.into());
        self
    }

    /// Build the engine, restoring registry state from the store if present
    pub async fn build(self) -> Result<FraudEngine> {
        self.config.validate()?;

        let store: Option<Arc<dyn RuleStore>> = match (self.store, &self.config.rule_store) {
            (Some(store), _) => Some(store),
            (None, Some(path)) => {
                Some(Arc::new(FileSystemRuleStore::new(path)?) as Arc<dyn RuleStore>)
            }
            (None, None) => None,
        };

        let registry = match &store {
            Some(store) => match store.load().await? {
                Some(state) => RuleRegistry::restore(state, self.config.audit_capacity)?,
                None => RuleRegistry::new(self.config.audit_capacity),
            },
            None => RuleRegistry::new(self.config.audit_capacity),
        };

        tracing::info!(
            rules = registry.len(),
            persistent = store.is_some(),
            "Fraud engine initialized"
        );

        Ok(FraudEngine::from_parts(self.config, registry, store))
    }
}

impl Default for FraudEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
