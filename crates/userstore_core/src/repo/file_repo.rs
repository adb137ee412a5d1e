//! JSON-file-backed user repository.
//!
//! # Responsibility
//! - Persist the full user set plus the id counter as one JSON snapshot.
//! - Serve reads from an in-memory copy loaded at open time.
//!
//! # Invariants
//! - Every successful mutation is written before it becomes visible.
//! - A failed write leaves both the file and the in-memory state unchanged.
//! - The snapshot is replaced atomically (temp file + rename).

use crate::model::filter::UserFilter;
use crate::model::user::{User, UserId};
use crate::repo::memory_repo::InMemoryUserRepository;
use crate::repo::user_repo::{RepoResult, UserRepository};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    /// `null` once an explicit `UserId::MAX` exhausted auto-assignment.
    next_id: Option<UserId>,
    users: Vec<User>,
}

/// Repository persisting to a single JSON file.
pub struct JsonFileUserRepository {
    path: PathBuf,
    inner: InMemoryUserRepository,
}

impl JsonFileUserRepository {
    /// Opens the snapshot at `path`, creating an empty one when missing.
    ///
    /// # Errors
    /// - `Io` when the file cannot be read or created.
    /// - `InvalidData` when the file is not a valid snapshot.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = match fs::read(&path) {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                InMemoryUserRepository::from_snapshot(snapshot.next_id, snapshot.users)?
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let inner = InMemoryUserRepository::new();
                write_snapshot(&path, &inner)?;
                inner
            }
            Err(err) => return Err(err.into()),
        };

        debug!(
            "event=repo_open module=repo backend=file status=ok count={}",
            inner.count()?
        );
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<T>(
        &mut self,
        apply: impl FnOnce(&mut InMemoryUserRepository) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut next = self.inner.clone();
        let value = apply(&mut next)?;
        if let Err(err) = write_snapshot(&self.path, &next) {
            error!("event=repo_persist module=repo backend=file status=error error={err}");
            return Err(err);
        }
        self.inner = next;
        Ok(value)
    }
}

impl UserRepository for JsonFileUserRepository {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        self.inner.find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        self.inner.find_all()
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<User>> {
        self.inner.find_by_name(name)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Vec<User>> {
        self.inner.find_by_email(email)
    }

    fn find_by_filter(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        self.inner.find_by_filter(filter)
    }

    fn save(&mut self, user: &User) -> RepoResult<User> {
        self.mutate(|repo| repo.save(user))
    }

    fn delete_by_id(&mut self, id: UserId) -> RepoResult<()> {
        if !self.inner.exists_by_id(id)? {
            return Ok(());
        }
        self.mutate(|repo| repo.delete_by_id(id))
    }

    fn exists_by_id(&self, id: UserId) -> RepoResult<bool> {
        self.inner.exists_by_id(id)
    }

    fn count(&self) -> RepoResult<usize> {
        self.inner.count()
    }

    fn find_active_users(&self) -> RepoResult<Vec<User>> {
        self.inner.find_active_users()
    }

    fn update_user_status(&mut self, id: UserId, active: bool) -> RepoResult<()> {
        self.mutate(|repo| repo.update_user_status(id, active))
    }
}

fn write_snapshot(path: &Path, repo: &InMemoryUserRepository) -> RepoResult<()> {
    let snapshot = Snapshot {
        next_id: repo.next_id(),
        users: repo.find_all()?,
    };
    let bytes = serde_json::to_vec_pretty(&snapshot)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
