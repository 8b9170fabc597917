//! Data models for the repository layer

use chrono::{DateTime, Utc};
use riskwatch_core::Rule;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Input for creating a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    pub name: String,

    /// Initial state; there is no implicit default
    pub enabled: bool,

    /// Condition document, must be a JSON object
    pub conditions: JsonValue,

    /// Requested score, must be within [0, 100]
    pub score: i64,
}

impl RuleDraft {
    /// Create a new draft
    pub fn new(name: impl Into<String>, conditions: JsonValue, score: i64, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            conditions,
            score,
        }
    }
}

/// Partial update; unset fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl RulePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn conditions(mut self, conditions: JsonValue) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Kind of audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    RuleCreated,
    RuleUpdated,
    RuleDeleted,
    RuleEnabled,
    RuleDisabled,
    RuleSimulated,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::RuleCreated => "rule_created",
            AuditAction::RuleUpdated => "rule_updated",
            AuditAction::RuleDeleted => "rule_deleted",
            AuditAction::RuleEnabled => "rule_enabled",
            AuditAction::RuleDisabled => "rule_disabled",
            AuditAction::RuleSimulated => "rule_simulated",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One audit log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Insertion order, strictly increasing across the log's lifetime
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: AuditAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub details: String,
}

/// Audit log query; every set field must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    /// Case-insensitive substring of actor or details
    pub search: Option<String>,
    pub rule_id: Option<String>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Check if an entry matches this query
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }

        if let Some(rule_id) = &self.rule_id {
            if entry.rule_id.as_deref() != Some(rule_id.as_str()) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !entry.actor.to_lowercase().contains(&term)
                && !entry.details.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        true
    }
}

/// Persistable registry document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryState {
    /// Next numeric suffix handed out for rule IDs
    pub next_id: u64,
    /// Rules in creation order
    pub rules: Vec<Rule>,
    /// Audit entries, oldest first
    #[serde(default)]
    pub audit: Vec<AuditEntry>,
}
