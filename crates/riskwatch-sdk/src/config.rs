//! Configuration types for FraudEngine

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Audit entries retained (oldest evicted first)
    pub audit_capacity: usize,

    /// Scored transactions retained for queries and simulation
    pub history_capacity: usize,

    /// Upper bound on the simulation sample size
    pub simulation_window: usize,

    /// Actor recorded when the host has none
    pub default_actor: String,

    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Rule state file; no persistence when unset
    pub rule_store: Option<PathBuf>,

    /// Log output format
    pub log_format: LogFormat,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            audit_capacity: 1000,
            history_capacity: 1000,
            simulation_window: 100,
            default_actor: "system".to_string(),
            enable_metrics: true,
            rule_store: None,
            log_format: LogFormat::Text,
        }
    }

    /// Load configuration from `.env`, `config/riskwatch.*` and `RISKWATCH_*` variables
    pub fn load() -> Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/riskwatch").required(false))
            .add_source(config::Environment::with_prefix("RISKWATCH").try_parsing(true))
            .build();

        let loaded: Self = match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| SdkError::ConfigError(format!("Failed to deserialize config: {}", e)))?,
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Self::default()
            }
        };

        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from an explicit file, with `RISKWATCH_*` overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let loaded: Self = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(config::Environment::with_prefix("RISKWATCH").try_parsing(true))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                SdkError::ConfigError(format!("Failed to load {}: {}", path.display(), e))
            })?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject capacities that would make the engine useless
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("audit_capacity", self.audit_capacity),
            ("history_capacity", self.history_capacity),
            ("simulation_window", self.simulation_window),
        ] {
            if value == 0 {
                return Err(SdkError::ConfigError(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = capacity;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_simulation_window(mut self, window: usize) -> Self {
        self.simulation_window = window;
        self
    }

    pub fn with_default_actor(mut self, actor: impl Into<String>) -> Self {
        self.default_actor = actor.into();
        self
    }

    /// Set rule state file
    pub fn with_rule_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.rule_store = Some(path.into());
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
