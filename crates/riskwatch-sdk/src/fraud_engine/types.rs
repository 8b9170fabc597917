//! FraudEngine report types

use riskwatch_runtime::{SimulationResult, SimulationSummary};
use serde::{Deserialize, Serialize};

/// Outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub candidate_name: String,
    pub candidate_score: u8,
    /// Per-transaction results, in history order (most recent first)
    pub results: Vec<SimulationResult>,
    pub summary: SimulationSummary,
}

impl SimulationReport {
    pub fn sample_size(&self) -> usize {
        self.results.len()
    }
}
