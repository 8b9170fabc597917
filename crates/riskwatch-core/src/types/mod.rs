//! Type system for RiskWatch
//!
//! This module contains:
//! - Value types used for field lookup and condition operands
//! - The transaction record supplied by the ingestion source

pub mod transaction;
pub mod value;

pub use transaction::Transaction;
pub use value::Value;
