//! Repository layer: the user storage contract and its backends.
//!
//! # Responsibility
//! - Define the `UserRepository` contract every backend satisfies.
//! - Provide in-memory, SQLite and JSON-file implementations.
//!
//! # Invariants
//! - Reads over absent data return `Ok(None)` / empty vectors.
//! - Assigned ids are never reused within one store.

pub mod factory;
pub mod file_repo;
pub mod memory_repo;
pub mod sqlite_repo;
pub mod user_repo;
