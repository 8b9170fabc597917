//! Evaluation results and execution traces

mod annotated;
mod simulation;
mod trace;

pub use annotated::AnnotatedTransaction;
pub use simulation::{Impact, SimulationResult, SimulationSummary};
pub use trace::{ConditionOutcome, RuleTrace};
