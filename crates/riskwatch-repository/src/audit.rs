//! Bounded audit log
//!
//! Every registry mutation and every simulation appends one entry. The log
//! keeps the most recent `capacity` entries and evicts the oldest first.

use crate::models::{AuditAction, AuditEntry, AuditQuery};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of audit entries retained
pub const DEFAULT_AUDIT_CAPACITY: usize = 1000;

#[derive(Debug)]
struct AuditInner {
    entries: VecDeque<AuditEntry>,
    next_sequence: u64,
}

/// Append-only, bounded log of registry activity
///
/// Entries are written by [`RuleRegistry`](crate::RuleRegistry) only.
/// Holders of a log can read and query it but not append:
///
/// ```compile_fail
/// use riskwatch_repository::{AuditAction, RuleRegistry};
///
/// let registry = RuleRegistry::default();
/// registry
///     .audit()
///     .append("admin", AuditAction::RuleDeleted, Some("rule_1"), "forged");
/// ```
#[derive(Debug)]
pub struct AuditLog {
    capacity: usize,
    inner: Mutex<AuditInner>,
}

impl AuditLog {
    /// Create a log retaining at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(AuditInner {
                entries: VecDeque::with_capacity(capacity),
                next_sequence: 1,
            }),
        }
    }

    /// Rebuild a log from persisted entries (oldest first)
    ///
    /// Only the newest `capacity` entries are kept, and sequence numbers
    /// continue after the highest one restored.
    pub fn from_entries(entries: Vec<AuditEntry>, capacity: usize) -> Self {
        let log = Self::new(capacity);
        {
            let mut inner = log.lock();
            let skip = entries.len().saturating_sub(log.capacity);
            inner.next_sequence = entries.iter().map(|e| e.sequence).max().unwrap_or(0) + 1;
            inner.entries.extend(entries.into_iter().skip(skip));
        }
        log
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, evicting the oldest one beyond capacity
    pub(crate) fn append(
        &self,
        actor: &str,
        action: AuditAction,
        rule_id: Option<&str>,
        details: impl Into<String>,
    ) -> AuditEntry {
        let mut inner = self.lock();

        let entry = AuditEntry {
            sequence: inner.next_sequence,
            timestamp: Utc::now(),
            actor: actor.to_string(),
            action,
            rule_id: rule_id.map(str::to_string),
            details: details.into(),
        };
        inner.next_sequence += 1;

        inner.entries.push_back(entry.clone());
        while inner.entries.len() > self.capacity {
            inner.entries.pop_front();
        }

        entry
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Up to `n` most recent entries, newest first
    pub fn recent(&self, n: usize) -> Vec<AuditEntry> {
        self.lock().entries.iter().rev().take(n).cloned().collect()
    }

    /// Retained entries matching a query, newest first
    pub fn query(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        self.lock()
            .entries
            .iter()
            .rev()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, AuditInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}
