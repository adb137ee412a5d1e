//! User use-case service.
//!
//! # Responsibility
//! - Provide create/read/delete entry points over any `UserRepository`.
//!
//! # Invariants
//! - The service owns its repository exclusively, so `delete_user`'s
//!   existence check and removal cannot be observed apart.
//! - Service APIs never bypass repository contracts.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::{RepoResult, UserRepository};
use log::info;

/// Use-case service wrapper for user operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.find_by_id(id)
    }

    pub fn find_all(&self) -> RepoResult<Vec<User>> {
        self.repo.find_all()
    }

    pub fn find_active_users(&self) -> RepoResult<Vec<User>> {
        self.repo.find_active_users()
    }

    pub fn count(&self) -> RepoResult<usize> {
        self.repo.count()
    }

    /// Creates and persists a new active user.
    ///
    /// The email is stored as given; use `User::is_valid_email` to check it.
    pub fn create_user(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<User> {
        let user = User::new(name, email);
        let saved = self.repo.save(&user)?;
        info!(
            "event=user_create module=service status=ok id={}",
            saved.id().unwrap_or_default()
        );
        Ok(saved)
    }

    /// Deletes a user, reporting whether one existed.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is absent.
    pub fn delete_user(&mut self, id: UserId) -> RepoResult<bool> {
        if !self.repo.exists_by_id(id)? {
            info!("event=user_delete module=service status=absent id={id}");
            return Ok(false);
        }

        self.repo.delete_by_id(id)?;
        info!("event=user_delete module=service status=ok id={id}");
        Ok(true)
    }

    /// Sets the active flag; returns `RepoError::NotFound` for absent ids.
    pub fn set_user_active(&mut self, id: UserId, active: bool) -> RepoResult<()> {
        self.repo.update_user_status(id, active)?;
        info!("event=user_status module=service status=ok id={id} active={active}");
        Ok(())
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }
}
