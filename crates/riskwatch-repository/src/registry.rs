//! Versioned rule registry
//!
//! Mutations are serialized through a single writer lock and published as
//! immutable [`RuleSnapshot`]s. Readers clone the current `Arc` and never wait
//! on a mutation in progress; a snapshot always reflects either the state
//! before a mutation or the state after it.

use crate::audit::{AuditLog, DEFAULT_AUDIT_CAPACITY};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{AuditAction, AuditEntry, RegistryState, RuleDraft, RulePatch};
use chrono::Utc;
use riskwatch_core::{ConditionParser, ConditionSet, Rule, RuleSnapshot};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

const RULE_ID_PREFIX: &str = "rule_";

#[derive(Debug)]
struct Writer {
    next_id: u64,
}

/// In-memory registry owning the rule lifecycle and its audit log
#[derive(Debug)]
pub struct RuleRegistry {
    writer: Mutex<Writer>,
    published: RwLock<Arc<RuleSnapshot>>,
    audit: AuditLog,
    parser: ConditionParser,
}

impl RuleRegistry {
    /// Create an empty registry whose audit log keeps `audit_capacity` entries
    pub fn new(audit_capacity: usize) -> Self {
        Self {
            writer: Mutex::new(Writer { next_id: 1 }),
            published: RwLock::new(Arc::new(RuleSnapshot::default())),
            audit: AuditLog::new(audit_capacity),
            parser: ConditionParser::new(),
        }
    }

    /// Rebuild a registry from a persisted document
    pub fn restore(state: RegistryState, audit_capacity: usize) -> RepositoryResult<Self> {
        let mut seen = HashSet::new();
        let mut next_id = state.next_id.max(1);

        for rule in &state.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(RepositoryError::Validation(format!(
                    "duplicate rule id in persisted state: {}",
                    rule.id
                )));
            }
            Rule::validate_score(i64::from(rule.score))?;
            if rule.version == 0 {
                return Err(RepositoryError::Validation(format!(
                    "rule {} has version 0",
                    rule.id
                )));
            }
            if let Some(n) = numeric_suffix(&rule.id) {
                next_id = next_id.max(n + 1);
            }
        }

        tracing::info!(
            rules = state.rules.len(),
            audit_entries = state.audit.len(),
            next_id,
            "Restored rule registry"
        );

        Ok(Self {
            writer: Mutex::new(Writer { next_id }),
            published: RwLock::new(Arc::new(RuleSnapshot::from_rules(1, state.rules))),
            audit: AuditLog::from_entries(state.audit, audit_capacity),
            parser: ConditionParser::new(),
        })
    }

    /// Produce a persistable document of the current state
    pub fn export(&self) -> RegistryState {
        // Holding the writer keeps next_id and the rule list consistent
        let writer = self.lock_writer();
        let snapshot = self.snapshot();
        RegistryState {
            next_id: writer.next_id,
            rules: snapshot.iter().cloned().collect(),
            audit: self.audit.entries(),
        }
    }

    /// Current rule set, in creation order
    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Rule> {
        self.snapshot().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Create a rule with a fresh id at version 1
    pub fn create(&self, actor: &str, draft: RuleDraft) -> RepositoryResult<Rule> {
        let score = Rule::validate_score(draft.score)?;
        let conditions = self.parse_conditions(&draft.conditions)?;

        let mut writer = self.lock_writer();
        let current = self.snapshot();

        let mut id = format!("{}{}", RULE_ID_PREFIX, writer.next_id);
        writer.next_id += 1;
        while current.get(&id).is_some() {
            id = format!("{}{}", RULE_ID_PREFIX, writer.next_id);
            writer.next_id += 1;
        }

        let rule = Rule::new(id, draft.name, conditions, score).with_enabled(draft.enabled);

        let mut rules = current.shared_rules().to_vec();
        rules.push(Arc::new(rule.clone()));
        self.publish(&current, rules);

        self.audit.append(
            actor,
            AuditAction::RuleCreated,
            Some(&rule.id),
            format!("Rule \"{}\" created", rule.name),
        );
        tracing::info!(rule_id = %rule.id, actor, "Rule created");

        Ok(rule)
    }

    /// Merge a patch into an existing rule and bump its version
    ///
    /// An unknown id is reported before the patch is validated.
    pub fn update(&self, actor: &str, id: &str, patch: RulePatch) -> RepositoryResult<Rule> {
        let _writer = self.lock_writer();
        let current = self.snapshot();
        let index = position(&current, id)?;

        let score = patch.score.map(Rule::validate_score).transpose()?;
        let conditions = patch
            .conditions
            .as_ref()
            .map(|doc| self.parse_conditions(doc))
            .transpose()?;

        let mut rule = current.shared_rules()[index].as_ref().clone();
        if let Some(name) = patch.name {
            rule.name = name;
        }
        if let Some(enabled) = patch.enabled {
            rule.enabled = enabled;
        }
        if let Some(conditions) = conditions {
            rule.conditions = conditions;
        }
        if let Some(score) = score {
            rule.score = score;
        }
        rule.version += 1;
        rule.updated_at = Utc::now();

        let mut rules = current.shared_rules().to_vec();
        rules[index] = Arc::new(rule.clone());
        self.publish(&current, rules);

        self.audit.append(
            actor,
            AuditAction::RuleUpdated,
            Some(&rule.id),
            format!("Rule \"{}\" updated to version {}", rule.name, rule.version),
        );
        tracing::info!(rule_id = %rule.id, version = rule.version, actor, "Rule updated");

        Ok(rule)
    }

    /// Remove a rule permanently; its id is never reissued
    pub fn delete(&self, actor: &str, id: &str) -> RepositoryResult<()> {
        let _writer = self.lock_writer();
        let current = self.snapshot();
        let index = position(&current, id)?;

        let mut rules = current.shared_rules().to_vec();
        let removed = rules.remove(index);
        self.publish(&current, rules);

        self.audit.append(
            actor,
            AuditAction::RuleDeleted,
            Some(&removed.id),
            format!("Rule \"{}\" deleted", removed.name),
        );
        tracing::info!(rule_id = %removed.id, actor, "Rule deleted");

        Ok(())
    }

    /// Flip a rule's enabled flag and bump its version
    pub fn toggle(&self, actor: &str, id: &str) -> RepositoryResult<Rule> {
        let _writer = self.lock_writer();
        let current = self.snapshot();
        let index = position(&current, id)?;

        let mut rule = current.shared_rules()[index].as_ref().clone();
        rule.enabled = !rule.enabled;
        rule.version += 1;
        rule.updated_at = Utc::now();

        let mut rules = current.shared_rules().to_vec();
        rules[index] = Arc::new(rule.clone());
        self.publish(&current, rules);

        let (action, verb) = if rule.enabled {
            (AuditAction::RuleEnabled, "enabled")
        } else {
            (AuditAction::RuleDisabled, "disabled")
        };
        self.audit.append(
            actor,
            action,
            Some(&rule.id),
            format!("Rule \"{}\" {}", rule.name, verb),
        );
        tracing::info!(rule_id = %rule.id, enabled = rule.enabled, actor, "Rule toggled");

        Ok(rule)
    }

    /// Record a completed simulation run
    pub fn record_simulation(&self, actor: &str, rule_name: &str, sample_size: usize) -> AuditEntry {
        tracing::info!(candidate = rule_name, sample_size, actor, "Rule simulated");
        self.audit.append(
            actor,
            AuditAction::RuleSimulated,
            None,
            format!(
                "Simulated rule \"{}\" on {} transactions",
                rule_name, sample_size
            ),
        )
    }

    /// Record a simulation whose candidate could not be parsed
    pub fn record_failed_simulation(&self, actor: &str, rule_name: &str, reason: &str) -> AuditEntry {
        tracing::info!(candidate = rule_name, actor, reason, "Rule simulation rejected");
        self.audit.append(
            actor,
            AuditAction::RuleSimulated,
            None,
            format!("Simulation of rule \"{}\" failed: {}", rule_name, reason),
        )
    }

    fn parse_conditions(&self, document: &JsonValue) -> RepositoryResult<ConditionSet> {
        Ok(self.parser.parse(document)?)
    }

    fn publish(&self, current: &RuleSnapshot, rules: Vec<Arc<Rule>>) {
        let next = Arc::new(RuleSnapshot::new(current.generation() + 1, rules));
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn lock_writer(&self) -> MutexGuard<'_, Writer> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}

fn position(snapshot: &RuleSnapshot, id: &str) -> RepositoryResult<usize> {
    snapshot
        .iter()
        .position(|rule| rule.id == id)
        .ok_or_else(|| RepositoryError::not_found(id))
}

fn numeric_suffix(id: &str) -> Option<u64> {
    id.strip_prefix(RULE_ID_PREFIX)?.parse().ok()
}
