//! Simulation results

use riskwatch_core::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a candidate rule would move a transaction's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    Increased,
    Decreased,
    NoChange,
}

impl Impact {
    /// Classify a score change
    pub fn classify(original: u8, new: u8) -> Self {
        match new.cmp(&original) {
            std::cmp::Ordering::Greater => Impact::Increased,
            std::cmp::Ordering::Less => Impact::Decreased,
            std::cmp::Ordering::Equal => Impact::NoChange,
        }
    }
}

/// Candidate rule outcome for one historical transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub transaction: Transaction,

    /// Cumulative score recorded when the transaction was scored live
    pub original_score: u8,

    /// Score with the candidate rule applied on top, capped at 100
    pub new_score: u8,

    /// Whether the candidate rule matched
    pub matched: bool,

    pub impact: Impact,

    /// Clause-level results of the candidate rule
    pub details: BTreeMap<String, bool>,
}

impl SimulationResult {
    /// Score change, `new - original`
    pub fn delta(&self) -> i32 {
        i32::from(self.new_score) - i32::from(self.original_score)
    }
}

/// Aggregate view over one simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_tested: usize,
    pub matched: usize,
    pub increased: usize,
    pub decreased: usize,
    /// Rounded mean of per-transaction score change
    pub average_delta: i32,
}

impl SimulationSummary {
    /// Summarise a set of results
    pub fn from_results(results: &[SimulationResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let total_delta: i64 = results.iter().map(|r| i64::from(r.delta())).sum();
        let average = total_delta as f64 / results.len() as f64;

        Self {
            total_tested: results.len(),
            matched: results.iter().filter(|r| r.matched).count(),
            increased: results
                .iter()
                .filter(|r| r.impact == Impact::Increased)
                .count(),
            decreased: results
                .iter()
                .filter(|r| r.impact == Impact::Decreased)
                .count(),
            average_delta: average.round() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(original: u8, new: u8) -> SimulationResult {
        SimulationResult {
            transaction: Transaction::new("t", "u", 1.0, "US", Utc::now()),
            original_score: original,
            new_score: new,
            matched: new != original,
            impact: Impact::classify(original, new),
            details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_impact_classification() {
        assert_eq!(Impact::classify(10, 40), Impact::Increased);
        assert_eq!(Impact::classify(40, 10), Impact::Decreased);
        assert_eq!(Impact::classify(100, 100), Impact::NoChange);
    }

    #[test]
    fn test_impact_serde() {
        assert_eq!(serde_json::to_string(&Impact::NoChange).unwrap(), r#""no-change""#);
        assert_eq!(serde_json::to_string(&Impact::Increased).unwrap(), r#""increased""#);
    }

    #[test]
    fn test_summary() {
        let results = vec![result(0, 45), result(75, 100), result(20, 20)];
        let summary = SimulationSummary::from_results(&results);

        assert_eq!(summary.total_tested, 3);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.increased, 2);
        assert_eq!(summary.decreased, 0);
        // (45 + 25 + 0) / 3 = 23.33
        assert_eq!(summary.average_delta, 23);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(SimulationSummary::from_results(&[]), SimulationSummary::default());
    }
}
