//! Simulation / replay of a candidate rule over scored history
//!
//! Uses the same evaluator as live scoring, so a candidate behaves in the
//! sandbox exactly as it would once committed. Nothing here touches the
//! registry or the history it reads.

use super::evaluator::ConditionEvaluator;
use super::scoring::cap_score;
use crate::error::{Result, RuntimeError};
use crate::result::{AnnotatedTransaction, Impact, SimulationResult};
use riskwatch_core::{ConditionParser, ConditionSet, MAX_RULE_SCORE};
use serde_json::Value as JsonValue;

/// Name given to candidates that do not carry one
pub const UNNAMED_CANDIDATE: &str = "Unnamed rule";

/// A rule under test, not yet committed to the registry
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRule {
    pub name: String,
    pub conditions: ConditionSet,
    pub score: u8,
}

impl CandidateRule {
    pub fn new(name: impl Into<String>, conditions: ConditionSet, score: u8) -> Self {
        Self {
            name: name.into(),
            conditions,
            score: score.min(MAX_RULE_SCORE),
        }
    }

    /// Parse a candidate from its authoring document.
    ///
    /// Expects `{"name"?: string, "conditions": object, "score"?: number}`.
    /// The score is rounded and clamped to [0, 100].
    pub fn from_json(document: &JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = document else {
            return Err(RuntimeError::Validation(
                "candidate rule must be a JSON object".to_string(),
            ));
        };

        let conditions = map.get("conditions").ok_or_else(|| {
            RuntimeError::Validation("candidate rule has no conditions".to_string())
        })?;
        let conditions = ConditionParser::new().parse(conditions)?;

        let name = map
            .get("name")
            .and_then(JsonValue::as_str)
            .unwrap_or(UNNAMED_CANDIDATE)
            .to_string();

        let score = match map.get("score") {
            None | Some(JsonValue::Null) => 0,
            Some(value) => {
                let raw = value.as_f64().ok_or_else(|| {
                    RuntimeError::Validation(format!("candidate score must be a number, got {}", value))
                })?;
                raw.round().clamp(0.0, f64::from(MAX_RULE_SCORE)) as u8
            }
        };

        Ok(Self::new(name, conditions, score))
    }
}

/// Replays candidate rules over previously scored transactions
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulationEngine {
    evaluator: ConditionEvaluator,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `candidate` over the first `window` transactions of `history`.
    ///
    /// The caller controls ordering (typically most recent first).
    pub fn simulate<'a, I>(&self, candidate: &CandidateRule, history: I, window: usize) -> Vec<SimulationResult>
    where
        I: IntoIterator<Item = &'a AnnotatedTransaction>,
    {
        let results: Vec<SimulationResult> = history
            .into_iter()
            .take(window)
            .map(|scored| self.replay_one(candidate, scored))
            .collect();

        tracing::debug!(
            candidate = %candidate.name,
            sample_size = results.len(),
            "Simulation finished"
        );

        results
    }

    fn replay_one(&self, candidate: &CandidateRule, scored: &AnnotatedTransaction) -> SimulationResult {
        let outcome = self.evaluator.evaluate(&candidate.conditions, &scored.transaction);
        let original_score = scored.cumulative_score;
        let new_score = if outcome.matched {
            cap_score(u32::from(original_score) + u32::from(candidate.score))
        } else {
            original_score
        };

        SimulationResult {
            transaction: scored.transaction.clone(),
            original_score,
            new_score,
            matched: outcome.matched,
            impact: Impact::classify(original_score, new_score),
            details: outcome.details,
        }
    }
}
