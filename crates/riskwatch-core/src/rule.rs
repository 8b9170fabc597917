//! Rule definitions

use crate::condition::ConditionSet;
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable rule identifier, assigned at creation and never reused
pub type RuleId = String;

/// Upper bound of a rule's score contribution and of a cumulative score
pub const MAX_RULE_SCORE: u8 = 100;

/// Rule definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Unique rule ID
    pub id: RuleId,

    /// Human-readable name
    pub name: String,

    /// Disabled rules are skipped by the scoring pipeline
    pub enabled: bool,

    /// Per-field clauses combined by logical AND
    pub conditions: ConditionSet,

    /// Score to add if the rule matches, within [0, 100]
    pub score: u8,

    /// Starts at 1, incremented on every edit and toggle
    pub version: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// Create a new enabled rule at version 1
    pub fn new(id: impl Into<RuleId>, name: impl Into<String>, conditions: ConditionSet, score: u8) -> Self {
        let now = Utc::now();
        Rule {
            id: id.into(),
            name: name.into(),
            enabled: true,
            conditions,
            score: score.min(MAX_RULE_SCORE),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check a requested score against [0, 100]
    pub fn validate_score(score: i64) -> Result<u8> {
        if (0..=i64::from(MAX_RULE_SCORE)).contains(&score) {
            Ok(score as u8)
        } else {
            Err(CoreError::Validation(format!(
                "score must be between 0 and {}, got {}",
                MAX_RULE_SCORE, score
            )))
        }
    }
}
