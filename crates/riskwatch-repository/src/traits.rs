//! Persistence seam for registry state
//!
//! The registry itself is purely in-memory. A [`RuleStore`] lets a host load
//! a previously exported [`RegistryState`] at startup and save it again on
//! demand. No durability guarantee is implied beyond what a store provides.
//!
//! # Example
//!
//! ```no_run
//! use riskwatch_repository::{FileSystemRuleStore, RuleRegistry, RuleStore};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = FileSystemRuleStore::new("state/rules.json")?;
//!
//! let registry = match store.load().await? {
//!     Some(state) => RuleRegistry::restore(state, 1000)?,
//!     None => RuleRegistry::default(),
//! };
//!
//! store.save(&registry.export()).await?;
//! # Ok(())
//! # }
//! ```

use crate::models::RegistryState;
use crate::RepositoryResult;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Storage backend for registry state
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Load the persisted state, or `None` if nothing was saved yet
    async fn load(&self) -> RepositoryResult<Option<RegistryState>>;

    /// Replace the persisted state
    async fn save(&self, state: &RegistryState) -> RepositoryResult<()>;
}

/// Store keeping state in process memory; useful for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    state: RwLock<Option<RegistryState>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn load(&self) -> RepositoryResult<Option<RegistryState>> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, state: &RegistryState) -> RepositoryResult<()> {
        *self.state.write().await = Some(state.clone());
        Ok(())
    }
}
