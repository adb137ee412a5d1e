//! Declarative multi-criterion user matcher.
//!
//! # Invariants
//! - `matches` is the conjunction of every present criterion.
//! - Absent criteria, and an empty `name_like`, match everything.
//! - Id bounds are inclusive; a user without an id fails any id bound.

use crate::model::user::{User, UserId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub active: Option<bool>,
    /// Inclusive lower id bound.
    pub min_id: Option<UserId>,
    /// Inclusive upper id bound.
    pub max_id: Option<UserId>,
    /// Case-sensitive substring of `name`.
    pub name_like: String,
}

impl UserFilter {
    /// Filter selecting active users only.
    pub fn active_only() -> Self {
        Self {
            active: Some(true),
            ..Self::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(active) = self.active {
            if user.is_active() != active {
                return false;
            }
        }

        if self.min_id.is_some() || self.max_id.is_some() {
            let Some(id) = user.id() else {
                return false;
            };
            if self.min_id.is_some_and(|min| id < min) {
                return false;
            }
            if self.max_id.is_some_and(|max| id > max) {
                return false;
            }
        }

        self.name_like.is_empty() || user.name().contains(self.name_like.as_str())
    }
}
