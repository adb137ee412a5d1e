//! Backend selection.
//!
//! Callers pick a `RepositoryKind` once and program against
//! `dyn UserRepository` afterwards.

use crate::config::{RepositoryKind, StoreConfig};
use crate::repo::file_repo::JsonFileUserRepository;
use crate::repo::memory_repo::InMemoryUserRepository;
use crate::repo::sqlite_repo::SqliteUserRepository;
use crate::repo::user_repo::{RepoError, RepoResult, UserRepository};
use log::info;

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Builds the backend described by `config`.
    ///
    /// # Errors
    /// - `InvalidInput` for configs rejected by `StoreConfig::validate()`.
    /// - Backend open errors (`Db`, `Io`, `InvalidData`) unchanged.
    pub fn create(config: &StoreConfig) -> RepoResult<Box<dyn UserRepository>> {
        config.validate()?;

        let repo: Box<dyn UserRepository> = match (config.kind, config.path.as_deref()) {
            (RepositoryKind::InMemory, _) => Box::new(Self::create_in_memory()),
            (RepositoryKind::Database, Some(path)) => Box::new(SqliteUserRepository::open(path)?),
            (RepositoryKind::Database, None) => Box::new(SqliteUserRepository::open_in_memory()?),
            (RepositoryKind::FileBased, Some(path)) => {
                Box::new(JsonFileUserRepository::open(path)?)
            }
            (RepositoryKind::FileBased, None) => {
                return Err(RepoError::InvalidInput(
                    "file_based store requires `path`".to_string(),
                ));
            }
        };

        info!(
            "event=repo_create module=repo status=ok kind={:?}",
            config.kind
        );
        Ok(repo)
    }

    pub fn create_in_memory() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }
}
