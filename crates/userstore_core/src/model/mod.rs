//! Domain model for the user store.
//!
//! # Responsibility
//! - Define the `User` record and the `UserFilter` matcher.
//! - Keep derived state (display name, email validity) pure and side-effect free.
//!
//! # Invariants
//! - Identifiers are assigned by repositories, never derived from content.
//! - Email validity is a query, not a construction precondition.

pub mod filter;
pub mod user;
