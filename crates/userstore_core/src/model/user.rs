//! User domain model.
//!
//! # Responsibility
//! - Define the single persisted entity type and its derived-state helpers.
//! - Keep validity checks advisory: construction never rejects input.
//!
//! # Invariants
//! - `created_at` is set once at construction and has no setter.
//! - Equality, hashing and ordering use the identifier alone.
//! - `id == None` means "not yet assigned by a repository".
//!
//! # See also
//! - `crate::repo::user_repo::UserRepository`

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Repository-assigned identifier for a user.
pub type UserId = i64;

/// Exactly one `@` with non-empty local and domain parts.
static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+$").expect("valid email shape regex"));

const GUEST_NAME: &str = "Guest";
const GUEST_EMAIL: &str = "guest@example.com";
const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// Coarse account state.
///
/// Only `Active`/`Inactive` are backed by stored state today; `Suspended`
/// and `Pending` are representable but no repository persists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
    Pending,
}

impl UserStatus {
    /// Maps the persisted boolean flag to a status.
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Persisted user record.
///
/// Construction is permissive: an invalid email is stored as-is and
/// `is_valid_email()` reports it on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: Option<UserId>,
    name: String,
    email: String,
    /// Unix epoch milliseconds.
    created_at: i64,
    active: bool,
}

impl User {
    /// Creates an active user without an identifier.
    ///
    /// The repository assigns the id on `save`.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::build(None, name.into(), email.into(), now_epoch_ms(), true)
    }

    /// Creates an active user with a caller-provided identifier.
    ///
    /// Used when reconstructing records that already exist in storage.
    pub fn with_id(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::build(Some(id), name.into(), email.into(), now_epoch_ms(), true)
    }

    /// Rebuilds a record with every field supplied, including `created_at`.
    ///
    /// Backends use this when decoding stored rows.
    pub fn from_parts(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        created_at: i64,
        active: bool,
    ) -> Self {
        Self::build(Some(id), name.into(), email.into(), created_at, active)
    }

    /// Inactive placeholder account.
    pub fn guest() -> Self {
        let mut user = Self::new(GUEST_NAME, GUEST_EMAIL);
        user.deactivate();
        user
    }

    fn build(id: Option<UserId>, name: String, email: String, created_at: i64, active: bool) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
            active,
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    /// Returns the id when it is one a repository could have assigned.
    ///
    /// Non-positive ids are treated as unassigned.
    pub fn assigned_id(&self) -> Option<UserId> {
        self.id.filter(|id| is_valid_id(*id))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn status(&self) -> UserStatus {
        UserStatus::from_active(self.active)
    }

    pub fn set_id(&mut self, id: UserId) {
        self.id = Some(id);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Structural email check: exactly one `@`, non-empty on both sides.
    pub fn is_valid_email(&self) -> bool {
        EMAIL_SHAPE_RE.is_match(&self.email)
    }

    /// Returns `name`, falling back to `email`, then to `"Unknown"`.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.email.is_empty() {
            &self.email
        } else {
            UNKNOWN_DISPLAY_NAME
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for User {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for User {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "User{{id={id}, name={}, email={}}}", self.name, self.email),
            None => write!(
                f,
                "User{{id=unassigned, name={}, email={}}}",
                self.name, self.email
            ),
        }
    }
}

/// Returns whether `id` could have been assigned by a repository.
pub fn is_valid_id(id: UserId) -> bool {
    id > 0
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
