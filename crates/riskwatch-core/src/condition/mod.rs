//! Condition Parsing Module
//!
//! Rules carry a condition document authored as free-form JSON. This module
//! turns that document into a typed tree the evaluator can walk without
//! re-inspecting JSON on every transaction.
//!
//! # Syntax
//!
//! ```json
//! {
//!   "amount":  { "$gt": 1000, "$lt": 9000 },
//!   "country": { "$in": ["RU", "NG", "IR"] },
//!   "userId":  { "$regex": "^user_" }
//! }
//! ```
//!
//! ## Supported Operators
//! - `$gt` / `$lt` (numeric, strict)
//! - `$in` / `$nin` (membership)
//! - `$regex` (unanchored pattern test)
//!
//! Every other key is kept as a no-op clause.

mod parser;
mod types;

pub use parser::ConditionParser;
pub use types::{Clause, ConditionSet, FieldCondition, Operator, Pattern};
