//! Core logic for the user store.
//! This crate is the single source of truth for user identity and query rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{RepositoryKind, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::filter::UserFilter;
pub use model::user::{is_valid_id, User, UserId, UserStatus};
pub use repo::factory::RepositoryFactory;
pub use repo::file_repo::JsonFileUserRepository;
pub use repo::memory_repo::InMemoryUserRepository;
pub use repo::sqlite_repo::SqliteUserRepository;
pub use repo::user_repo::{RepoError, RepoResult, UserRepository};
pub use service::user_service::UserService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
