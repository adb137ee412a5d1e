//! User repository contract and shared error type.
//!
//! # Responsibility
//! - Define the operation set every storage backend provides.
//! - Keep "not found" on reads as `Ok(None)` / empty vectors, never errors.
//!
//! # Invariants
//! - `save` on a user without an id assigns the next id; ids are never reused.
//! - `save` on a user with an id overwrites that record entirely (upsert).
//! - `delete_by_id` on an absent id is a no-op.
//! - `update_user_status` on an absent id returns `RepoError::NotFound`.
//! - Returned users are independent copies of stored state.
//!
//! # Concurrency
//! Implementations are single-threaded. Callers sharing a repository across
//! threads must wrap it in their own lock (e.g. `std::sync::Mutex`).

use crate::db::DbError;
use crate::model::filter::UserFilter;
use crate::model::user::{User, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    NotFound(UserId),
    InvalidInput(String),
    Db(DbError),
    Io(std::io::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::NotFound(_) | Self::InvalidInput(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Repository interface for user CRUD and query operations.
pub trait UserRepository {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Every stored user in backend order, stable while unmodified.
    fn find_all(&self) -> RepoResult<Vec<User>>;
    /// Exact match on `name`.
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<User>>;
    /// Exact match on `email`.
    fn find_by_email(&self, email: &str) -> RepoResult<Vec<User>>;
    fn find_by_filter(&self, filter: &UserFilter) -> RepoResult<Vec<User>>;

    /// Inserts or overwrites `user` and returns the persisted copy.
    fn save(&mut self, user: &User) -> RepoResult<User>;
    fn delete_by_id(&mut self, id: UserId) -> RepoResult<()>;
    fn exists_by_id(&self, id: UserId) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<usize>;

    fn find_active_users(&self) -> RepoResult<Vec<User>> {
        self.find_by_filter(&UserFilter::active_only())
    }

    /// Sets the active flag on an existing user.
    fn update_user_status(&mut self, id: UserId, active: bool) -> RepoResult<()>;
}

impl<R: UserRepository + ?Sized> UserRepository for Box<R> {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        (**self).find_all()
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<User>> {
        (**self).find_by_name(name)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Vec<User>> {
        (**self).find_by_email(email)
    }

    fn find_by_filter(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        (**self).find_by_filter(filter)
    }

    fn save(&mut self, user: &User) -> RepoResult<User> {
        (**self).save(user)
    }

    fn delete_by_id(&mut self, id: UserId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }

    fn exists_by_id(&self, id: UserId) -> RepoResult<bool> {
        (**self).exists_by_id(id)
    }

    fn count(&self) -> RepoResult<usize> {
        (**self).count()
    }

    fn find_active_users(&self) -> RepoResult<Vec<User>> {
        (**self).find_active_users()
    }

    fn update_user_status(&mut self, id: UserId, active: bool) -> RepoResult<()> {
        (**self).update_user_status(id, active)
    }
}
