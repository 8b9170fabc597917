//! Operator execution modules
//!
//! Each function returns `None` when the clause does not apply to the
//! field value (wrong type), which the evaluator treats as "not evaluated".

mod membership;
mod pattern;
mod range;

pub(crate) use membership::{execute_in, execute_not_in};
pub(crate) use pattern::execute_regex;
pub(crate) use range::{execute_gt, execute_lt};
