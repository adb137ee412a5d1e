//! Core use-case services.
//!
//! # Responsibility
//! - Translate caller requests into repository calls.
//! - Keep callers decoupled from the chosen backend.

pub mod user_service;
