//! Store configuration.
//!
//! # Responsibility
//! - Describe which backend a caller wants and where it lives.
//! - Parse that description from JSON for embedding applications.
//!
//! # Invariants
//! - `FileBased` requires a path; `Database` without a path is in-memory SQLite.

use crate::repo::user_repo::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend variants a repository can be constructed as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryKind {
    #[default]
    InMemory,
    Database,
    FileBased,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: RepositoryKind,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// SQLite backend; `None` keeps the database in memory.
    pub fn database(path: Option<PathBuf>) -> Self {
        Self {
            kind: RepositoryKind::Database,
            path,
        }
    }

    pub fn file_based(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: RepositoryKind::FileBased,
            path: Some(path.into()),
        }
    }

    /// Parses a config such as `{"kind": "file_based", "path": "/var/users.json"}`.
    ///
    /// # Errors
    /// - `InvalidInput` when the JSON is malformed or fails `validate()`.
    pub fn from_json_str(raw: &str) -> RepoResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| RepoError::InvalidInput(format!("invalid store config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RepoResult<()> {
        if self.kind == RepositoryKind::FileBased && self.path.is_none() {
            return Err(RepoError::InvalidInput(
                "file_based store requires `path`".to_string(),
            ));
        }
        if self.path.as_ref().is_some_and(|path| path.as_os_str().is_empty()) {
            return Err(RepoError::InvalidInput("store path cannot be empty".to_string()));
        }
        Ok(())
    }
}
