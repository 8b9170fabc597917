//! File system based rule store

use async_trait::async_trait;
use path_absolutize::Absolutize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use crate::{error::RepositoryError, models::RegistryState, traits::RuleStore, RepositoryResult};

/// On-disk encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Yaml,
}

impl StoreFormat {
    /// `.yaml` / `.yml` select YAML; anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                StoreFormat::Yaml
            }
            _ => StoreFormat::Json,
        }
    }
}

/// Rule store backed by a single JSON or YAML file
///
/// Saves are atomic: each save writes its own uniquely named temp file in
/// the target's directory and renames it over the target, so overlapping
/// saves never see each other's partial output. The last rename wins.
#[derive(Debug, Clone)]
pub struct FileSystemRuleStore {
    path: PathBuf,
    format: StoreFormat,
}

impl FileSystemRuleStore {
    /// Create a store for `path`
    ///
    /// The file itself may not exist yet, but its parent directory must.
    ///
    /// # Example
    /// ```no_run
    /// use riskwatch_repository::FileSystemRuleStore;
    ///
    /// let store = FileSystemRuleStore::new("state/rules.yaml").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();

        let abs_path = path
            .absolutize()
            .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        // Validate that the parent directory exists
        match abs_path.parent() {
            Some(parent) if parent.is_dir() => {}
            _ => {
                return Err(RepositoryError::InvalidPath {
                    path: path.to_path_buf(),
                })
            }
        }

        Ok(Self {
            format: StoreFormat::from_path(&abs_path),
            path: abs_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn encode(&self, state: &RegistryState) -> RepositoryResult<String> {
        Ok(match self.format {
            StoreFormat::Json => serde_json::to_string_pretty(state)?,
            StoreFormat::Yaml => serde_yaml::to_string(state)?,
        })
    }

    fn decode(&self, content: &str) -> RepositoryResult<RegistryState> {
        Ok(match self.format {
            StoreFormat::Json => serde_json::from_str(content)?,
            StoreFormat::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

#[async_trait]
impl RuleStore for FileSystemRuleStore {
    async fn load(&self) -> RepositoryResult<Option<RegistryState>> {
        if !fs::try_exists(&self.path).await? {
            tracing::debug!(path = %self.path.display(), "No persisted rule state");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await?;
        let state = self.decode(&content)?;
        tracing::info!(
            path = %self.path.display(),
            rules = state.rules.len(),
            "Loaded rule state"
        );
        Ok(Some(state))
    }

    async fn save(&self, state: &RegistryState) -> RepositoryResult<()> {
        let content = self.encode(state)?;
        let dir = self.dir();
        let target = self.path.clone();

        tokio::task::spawn_blocking(move || -> RepositoryResult<()> {
            let mut temp = NamedTempFile::new_in(&dir)?;
            temp.write_all(content.as_bytes())?;
            temp.as_file().sync_all()?;
            temp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::Other(format!("Save task failed: {}", e)))??;

        tracing::info!(
            path = %self.path.display(),
            rules = state.rules.len(),
            "Saved rule state"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(StoreFormat::from_path(Path::new("a.yaml")), StoreFormat::Yaml);
        assert_eq!(StoreFormat::from_path(Path::new("a.YML")), StoreFormat::Yaml);
        assert_eq!(StoreFormat::from_path(Path::new("a.json")), StoreFormat::Json);
        assert_eq!(StoreFormat::from_path(Path::new("rules")), StoreFormat::Json);
    }

    #[test]
    fn test_missing_parent_is_invalid() {
        let result = FileSystemRuleStore::new("/definitely/not/here/rules.json");
        assert!(matches!(result, Err(RepositoryError::InvalidPath { .. })));
    }
}
