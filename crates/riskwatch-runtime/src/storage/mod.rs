//! Scored transaction history
//!
//! Bounded, most-recent-first store of annotated transactions. It feeds the
//! simulation window and answers the feed queries of the presentation layer.

use crate::result::AnnotatedTransaction;
use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Default number of scored transactions retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Scores above this are counted as high risk
pub const HIGH_RISK_THRESHOLD: u8 = 70;

/// Filter for history queries; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Case-insensitive substring of transaction id or user id
    pub search_term: Option<String>,

    /// Exact country code
    pub country: Option<String>,

    /// Inclusive cumulative score range
    pub score_range: Option<(u8, u8)>,

    /// Only transactions this rule matched
    pub rule_id: Option<String>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_score_range(mut self, min: u8, max: u8) -> Self {
        self.score_range = Some((min, max));
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Check if a scored transaction matches this filter
    pub fn matches(&self, scored: &AnnotatedTransaction) -> bool {
        if let Some(term) = &self.search_term {
            let term = term.to_lowercase();
            let txn = &scored.transaction;
            if !txn.id.to_lowercase().contains(&term) && !txn.user_id.to_lowercase().contains(&term) {
                return false;
            }
        }

        if let Some(country) = &self.country {
            if &scored.transaction.country != country {
                return false;
            }
        }

        if let Some((min, max)) = self.score_range {
            if scored.cumulative_score < min || scored.cumulative_score > max {
                return false;
            }
        }

        if let Some(rule_id) = &self.rule_id {
            if !scored.matched_rule(rule_id) {
                return false;
            }
        }

        true
    }
}

/// Aggregate figures over the retained history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    /// Every transaction ever recorded, including evicted ones
    pub total_processed: u64,
    /// Rounded mean cumulative score of retained transactions
    pub average_score: u8,
    /// Retained transactions stamped within the last second
    pub transactions_per_second: usize,
    /// Retained transactions scoring above the high-risk threshold
    pub high_risk: usize,
}

/// Count of retained transactions in one score band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBand {
    pub min: u8,
    pub max: u8,
    pub count: usize,
}

/// Volume and mean score for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryStats {
    pub country: String,
    pub transactions: usize,
    pub average_score: u8,
}

/// Activity within one clock hour (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyBucket {
    /// Start of the hour
    pub hour: DateTime<Utc>,
    pub transactions: usize,
    pub average_score: u8,
    pub high_risk: usize,
}

fn rounded_mean(sum: u64, count: usize) -> u8 {
    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as u8
    }
}

const RISK_BANDS: [(u8, u8); 5] = [(0, 20), (21, 40), (41, 60), (61, 80), (81, 100)];

/// Bounded in-memory history of scored transactions
#[derive(Debug)]
pub struct TransactionHistory {
    capacity: usize,
    entries: RwLock<VecDeque<Arc<AnnotatedTransaction>>>,
    total_processed: AtomicU64,
}

impl TransactionHistory {
    /// Create a history retaining at most `capacity` transactions
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::with_capacity(capacity.max(1))),
            total_processed: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a scored transaction, evicting the oldest beyond capacity
    pub fn record(&self, scored: AnnotatedTransaction) -> Arc<AnnotatedTransaction> {
        let scored = Arc::new(scored);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(scored.clone());
        entries.truncate(self.capacity);
        self.total_processed.fetch_add(1, Ordering::Relaxed);
        scored
    }

    /// Up to `n` most recent transactions, newest first
    pub fn recent(&self, n: usize) -> Vec<Arc<AnnotatedTransaction>> {
        self.read().iter().take(n).cloned().collect()
    }

    /// Retained transactions matching a filter, newest first
    pub fn query(&self, filter: &TransactionFilter) -> Vec<Arc<AnnotatedTransaction>> {
        self.read()
            .iter()
            .filter(|scored| filter.matches(scored))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every retained transaction; the processed total is kept
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Aggregate figures as of `now`
    pub fn stats(&self, now: DateTime<Utc>) -> HistoryStats {
        let entries = self.read();
        let window_start = now - Duration::seconds(1);

        let sum: u64 = entries.iter().map(|s| u64::from(s.cumulative_score)).sum();
        let average_score = rounded_mean(sum, entries.len());

        HistoryStats {
            total_processed: self.total_processed.load(Ordering::Relaxed),
            average_score,
            transactions_per_second: entries
                .iter()
                .filter(|s| s.transaction.timestamp() > window_start && s.transaction.timestamp() <= now)
                .count(),
            high_risk: entries
                .iter()
                .filter(|s| s.cumulative_score > HIGH_RISK_THRESHOLD)
                .count(),
        }
    }

    /// Retained transaction counts per score band
    pub fn risk_distribution(&self) -> Vec<RiskBand> {
        let entries = self.read();
        RISK_BANDS
            .iter()
            .map(|&(min, max)| RiskBand {
                min,
                max,
                count: entries
                    .iter()
                    .filter(|s| (min..=max).contains(&s.cumulative_score))
                    .count(),
            })
            .collect()
    }

    /// Busiest countries first, at most `limit` of them
    ///
    /// Ties are broken by country code.
    pub fn country_stats(&self, limit: usize) -> Vec<CountryStats> {
        let entries = self.read();
        let mut totals: HashMap<&str, (usize, u64)> = HashMap::new();
        for scored in entries.iter() {
            let total = totals.entry(scored.transaction.country.as_str()).or_default();
            total.0 += 1;
            total.1 += u64::from(scored.cumulative_score);
        }

        let mut stats: Vec<CountryStats> = totals
            .into_iter()
            .map(|(country, (count, sum))| CountryStats {
                country: country.to_string(),
                transactions: count,
                average_score: rounded_mean(sum, count),
            })
            .collect();
        stats.sort_by(|a, b| {
            b.transactions
                .cmp(&a.transactions)
                .then_with(|| a.country.cmp(&b.country))
        });
        stats.truncate(limit);
        stats
    }

    /// Per-hour activity over the 24 hours before `now`, oldest hour first
    ///
    /// Only the latest `hours` non-empty buckets are returned.
    pub fn hourly_trend(&self, now: DateTime<Utc>, hours: usize) -> Vec<HourlyBucket> {
        let entries = self.read();
        let day_start = now - Duration::hours(24);

        let mut buckets: BTreeMap<DateTime<Utc>, (usize, u64, usize)> = BTreeMap::new();
        for scored in entries.iter() {
            let at = scored.transaction.timestamp();
            if at <= day_start || at > now {
                continue;
            }
            let Ok(hour) = at.duration_trunc(Duration::hours(1)) else {
                continue;
            };
            let bucket = buckets.entry(hour).or_default();
            bucket.0 += 1;
            bucket.1 += u64::from(scored.cumulative_score);
            if scored.cumulative_score > HIGH_RISK_THRESHOLD {
                bucket.2 += 1;
            }
        }

        let skip = buckets.len().saturating_sub(hours);
        buckets
            .into_iter()
            .skip(skip)
            .map(|(hour, (count, sum, high_risk))| HourlyBucket {
                hour,
                transactions: count,
                average_score: rounded_mean(sum, count),
                high_risk,
            })
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, VecDeque<Arc<AnnotatedTransaction>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TransactionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskwatch_core::Transaction;

    fn scored(id: &str, user: &str, country: &str, score: u8, at: DateTime<Utc>) -> AnnotatedTransaction {
        AnnotatedTransaction {
            transaction: Transaction::new(id, user, 100.0, country, at),
            matched_rule_ids: if score > 0 { vec!["rule_1".to_string()] } else { vec![] },
            cumulative_score: score,
            execution_trace: Vec::new(),
            snapshot_generation: 1,
        }
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let history = TransactionHistory::new(3);
        let now = Utc::now();
        for i in 0..5 {
            history.record(scored(&format!("txn_{}", i), "user_1", "US", 0, now));
        }

        let ids: Vec<_> = history.recent(10).iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec!["txn_4", "txn_3", "txn_2"]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.stats(now).total_processed, 5);
    }

    #[test]
    fn test_query_filters() {
        let history = TransactionHistory::default();
        let now = Utc::now();
        history.record(scored("txn_a", "user_1", "US", 10, now));
        history.record(scored("txn_b", "USER_2", "NG", 90, now));
        history.record(scored("txn_c", "user_3", "NG", 0, now));

        assert_eq!(history.query(&TransactionFilter::new().with_country("NG")).len(), 2);
        assert_eq!(history.query(&TransactionFilter::new().with_search_term("user_2")).len(), 1);
        assert_eq!(history.query(&TransactionFilter::new().with_score_range(10, 90)).len(), 2);
        assert_eq!(history.query(&TransactionFilter::new().with_rule_id("rule_1")).len(), 2);

        let combined = TransactionFilter::new().with_country("NG").with_score_range(50, 100);
        let found = history.query(&combined);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), "txn_b");
    }

    #[test]
    fn test_stats() {
        let history = TransactionHistory::default();
        let now = Utc::now();
        history.record(scored("t1", "u", "US", 100, now - Duration::seconds(10)));
        history.record(scored("t2", "u", "US", 75, now));
        history.record(scored("t3", "u", "US", 0, now));

        let stats = history.stats(now);
        assert_eq!(stats.total_processed, 3);
        assert_eq!(stats.average_score, 58);
        assert_eq!(stats.transactions_per_second, 2);
        assert_eq!(stats.high_risk, 2);
    }

    #[test]
    fn test_risk_distribution() {
        let history = TransactionHistory::default();
        let now = Utc::now();
        for score in [0, 20, 21, 55, 80, 81, 100] {
            history.record(scored("t", "u", "US", score, now));
        }

        let counts: Vec<_> = history.risk_distribution().iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1, 2]);
    }

    #[test]
    fn test_country_stats() {
        let history = TransactionHistory::default();
        let now = Utc::now();
        history.record(scored("t1", "u", "NG", 90, now));
        history.record(scored("t2", "u", "NG", 75, now));
        history.record(scored("t3", "u", "US", 10, now));
        history.record(scored("t4", "u", "RU", 40, now));

        let stats = history.country_stats(8);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].country, "NG");
        assert_eq!(stats[0].transactions, 2);
        assert_eq!(stats[0].average_score, 83);
        // equal volume falls back to country code
        assert_eq!(stats[1].country, "RU");
        assert_eq!(stats[2].country, "US");

        assert_eq!(history.country_stats(1).len(), 1);
    }

    #[test]
    fn test_hourly_trend() {
        use chrono::TimeZone;

        let history = TransactionHistory::default();
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 30, 0).unwrap();
        history.record(scored("old", "u", "US", 100, now - Duration::hours(30)));
        history.record(scored("a", "u", "US", 80, now - Duration::hours(2)));
        history.record(scored("b", "u", "US", 20, now - Duration::hours(2)));
        history.record(scored("c", "u", "US", 75, now - Duration::minutes(10)));
        history.record(scored("later", "u", "US", 50, now + Duration::minutes(5)));

        let trend = history.hourly_trend(now, 12);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].hour, Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap());
        assert_eq!(trend[0].transactions, 2);
        assert_eq!(trend[0].average_score, 50);
        assert_eq!(trend[0].high_risk, 1);
        assert_eq!(trend[1].hour, Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap());
        assert_eq!(trend[1].high_risk, 1);

        let latest = history.hourly_trend(now, 1);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].transactions, 1);
    }

    #[test]
    fn test_clear_keeps_total() {
        let history = TransactionHistory::default();
        history.record(scored("t", "u", "US", 0, Utc::now()));
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.stats(Utc::now()).total_processed, 1);
    }
}
