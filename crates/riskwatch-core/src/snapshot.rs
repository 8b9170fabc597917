//! Immutable point-in-time view of the rule set

use crate::rule::Rule;
use std::sync::Arc;

/// Rules as of one registry generation, in creation order.
///
/// Rules are shared with later snapshots through `Arc`, so publishing a new
/// generation copies pointers, not condition trees.
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    generation: u64,
    rules: Vec<Arc<Rule>>,
}

impl RuleSnapshot {
    /// Create a snapshot for a registry generation
    pub fn new(generation: u64, rules: Vec<Arc<Rule>>) -> Self {
        Self { generation, rules }
    }

    /// Build a snapshot from owned rules (tests, simulations, restores)
    pub fn from_rules(generation: u64, rules: impl IntoIterator<Item = Rule>) -> Self {
        Self::new(generation, rules.into_iter().map(Arc::new).collect())
    }

    /// Registry generation this snapshot was taken at
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Iterate rules in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Shared handles to the rules, for building the next generation
    pub fn shared_rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of enabled rules
    pub fn enabled_count(&self) -> usize {
        self.iter().filter(|r| r.enabled).count()
    }
}
