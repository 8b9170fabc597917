//! Rule evaluation engine
//!
//! - [`ConditionEvaluator`]: matches one condition tree against one transaction
//! - [`ScoringPipeline`]: runs every enabled rule of a snapshot and aggregates
//! - [`SimulationEngine`]: replays a candidate rule over scored history

mod evaluator;
mod operators;
mod scoring;
mod simulation;

pub use evaluator::{evaluate, ConditionEvaluator};
pub use scoring::ScoringPipeline;
pub use simulation::{CandidateRule, SimulationEngine, UNNAMED_CANDIDATE};
