//! FraudEngine - Main API for rule management, scoring and simulation
//!
//! The module is organized into:
//! - `types`: report types returned by the engine
//! - `engine`: the `FraudEngine` facade tying registry, pipeline and history together

mod engine;
mod types;

pub use engine::FraudEngine;
pub use types::SimulationReport;
