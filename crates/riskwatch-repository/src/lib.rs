//! Rule registry and audit log for the RiskWatch engine
//!
//! This crate owns the rule lifecycle: creation, partial updates,
//! enable/disable toggles and deletion, each recorded in a bounded audit log.
//! Scoring reads rules through immutable snapshots, so mutations never block
//! evaluation in flight.
//!
//! # Features
//!
//! - **Versioned registry**: copy-on-write rule set with a single writer
//! - **Audit log**: bounded, FIFO-evicting record of every mutation and simulation
//! - **Persistence seam**: async [`RuleStore`] trait with file system and in-memory stores
//!
//! # Quick Start
//!
//! ```
//! use riskwatch_repository::{RuleDraft, RulePatch, RuleRegistry};
//! use serde_json::json;
//!
//! let registry = RuleRegistry::default();
//!
//! let rule = registry.create(
//!     "admin",
//!     RuleDraft::new("High Amount", json!({"amount": {"$gt": 5000}}), 75, true),
//! )?;
//! assert_eq!(rule.version, 1);
//!
//! let rule = registry.update("admin", &rule.id, RulePatch::new().score(80))?;
//! assert_eq!(rule.version, 2);
//!
//! let snapshot = registry.snapshot();
//! assert_eq!(snapshot.len(), 1);
//! # Ok::<(), riskwatch_repository::RepositoryError>(())
//! ```

pub mod audit;
pub mod error;
pub mod file_system;
pub mod models;
pub mod registry;
pub mod traits;

pub use audit::{AuditLog, DEFAULT_AUDIT_CAPACITY};
pub use error::{RepositoryError, RepositoryResult};
pub use file_system::{FileSystemRuleStore, StoreFormat};
pub use models::{AuditAction, AuditEntry, AuditQuery, RegistryState, RuleDraft, RulePatch};
pub use registry::RuleRegistry;
pub use traits::{MemoryRuleStore, RuleStore};
