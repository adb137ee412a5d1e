//! In-memory user repository.
//!
//! # Responsibility
//! - Hold users keyed by id for the lifetime of the repository value.
//! - Serve every query through one predicate primitive (`find_where`).
//!
//! # Invariants
//! - Keys are unique and equal to the stored user's id.
//! - `next_id` starts at 1, only grows, and is never handed out twice, even
//!   after the user holding it is deleted.
//! - An explicit id at or beyond `next_id` moves `next_id` past it; an explicit
//!   `UserId::MAX` is stored and leaves the counter exhausted (`None`).
//! - Only auto-assignment fails on an exhausted counter, never an upsert.
//! - Iteration order is id ascending.
//! - `clear()` restores the freshly constructed state.

use crate::model::filter::UserFilter;
use crate::model::user::{User, UserId};
use crate::repo::user_repo::{RepoError, RepoResult, UserRepository};
use log::debug;
use std::collections::BTreeMap;

pub(crate) const FIRST_USER_ID: UserId = 1;

const SAMPLE_USERS: &[(&str, &str, bool)] = &[
    ("Alice Johnson", "alice@example.com", true),
    ("Bob Smith", "bob@example.com", true),
    ("Charlie Brown", "charlie@example.com", false),
    ("Diana Prince", "diana@example.com", true),
];

/// Repository backed by an owned ordered map.
///
/// Not thread-safe; see the contract docs in `user_repo`.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    users: BTreeMap<UserId, User>,
    next_id: Option<UserId>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: Some(FIRST_USER_ID),
        }
    }

    /// Rebuilds a repository from a stored snapshot.
    ///
    /// # Errors
    /// - `InvalidData` when a user lacks a valid id or ids repeat.
    pub(crate) fn from_snapshot(next_id: Option<UserId>, users: Vec<User>) -> RepoResult<Self> {
        let mut repo = Self::new();
        repo.next_id = next_id.map(|id| id.max(FIRST_USER_ID));
        for user in users {
            let id = user.assigned_id().ok_or_else(|| {
                let shown = user
                    .id()
                    .map_or_else(|| "unassigned".to_string(), |id| id.to_string());
                RepoError::InvalidData(format!("stored user has invalid id {shown}"))
            })?;
            if repo.users.contains_key(&id) {
                return Err(RepoError::InvalidData(format!("duplicate stored user id {id}")));
            }
            repo.reserve_id(id);
            repo.users.insert(id, user);
        }
        Ok(repo)
    }

    /// Id the next auto-assigned save will receive, `None` once exhausted.
    pub fn next_id(&self) -> Option<UserId> {
        self.next_id
    }

    /// Returns copies of every user accepted by `predicate`, in id order.
    pub fn find_where<P>(&self, predicate: P) -> Vec<User>
    where
        P: Fn(&User) -> bool,
    {
        self.users
            .values()
            .filter(|user| predicate(*user))
            .cloned()
            .collect()
    }

    /// Drops every user and resets id assignment to the initial state.
    pub fn clear(&mut self) {
        self.users.clear();
        self.next_id = Some(FIRST_USER_ID);
        debug!("event=repo_clear module=repo backend=memory status=ok");
    }

    /// Saves a fixed set of demo users through the regular `save` path.
    pub fn load_sample_data(&mut self) -> RepoResult<Vec<User>> {
        let mut saved = Vec::with_capacity(SAMPLE_USERS.len());
        for (name, email, active) in SAMPLE_USERS {
            let mut user = User::new(*name, *email);
            user.set_active(*active);
            saved.push(self.save(&user)?);
        }
        debug!(
            "event=repo_seed module=repo backend=memory status=ok count={}",
            saved.len()
        );
        Ok(saved)
    }

    fn allocate_id(&mut self) -> RepoResult<UserId> {
        let id = self
            .next_id
            .ok_or_else(|| RepoError::InvalidInput("user id space exhausted".to_string()))?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    fn reserve_id(&mut self, id: UserId) {
        if let Some(next) = self.next_id {
            if id >= next {
                self.next_id = id.checked_add(1);
            }
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.users.get(&id).cloned())
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.find_where(|_| true))
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<User>> {
        Ok(self.find_where(|user| user.name() == name))
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Vec<User>> {
        Ok(self.find_where(|user| user.email() == email))
    }

    fn find_by_filter(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        Ok(self.find_where(|user| filter.matches(user)))
    }

    fn save(&mut self, user: &User) -> RepoResult<User> {
        let mut stored = user.clone();
        let id = match user.assigned_id() {
            Some(id) => {
                self.reserve_id(id);
                id
            }
            None => {
                let id = self.allocate_id()?;
                stored.set_id(id);
                id
            }
        };

        let replaced = self.users.insert(id, stored.clone()).is_some();
        debug!(
            "event=user_save module=repo backend=memory status=ok id={} replaced={}",
            id, replaced
        );
        Ok(stored)
    }

    fn delete_by_id(&mut self, id: UserId) -> RepoResult<()> {
        let removed = self.users.remove(&id).is_some();
        debug!(
            "event=user_delete module=repo backend=memory status=ok id={} removed={}",
            id, removed
        );
        Ok(())
    }

    fn exists_by_id(&self, id: UserId) -> RepoResult<bool> {
        Ok(self.users.contains_key(&id))
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.users.len())
    }

    fn find_active_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.find_where(User::is_active))
    }

    fn update_user_status(&mut self, id: UserId, active: bool) -> RepoResult<()> {
        let user = self.users.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        user.set_active(active);
        debug!(
            "event=user_status module=repo backend=memory status=ok id={} active={}",
            id, active
        );
        Ok(())
    }
}
