//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `userstore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use userstore_core::{InMemoryUserRepository, RepoResult, UserRepository, UserService};

fn main() {
    println!("userstore_core ping={}", userstore_core::ping());
    println!("userstore_core version={}", userstore_core::core_version());

    match seed_summary() {
        Ok((users, active)) => {
            println!("userstore_core users={users}");
            println!("userstore_core active_users={active}");
        }
        Err(err) => {
            eprintln!("userstore_core seed failed: {err}");
            std::process::exit(1);
        }
    }
}

/// Seeds sample users and returns `(total, active)` counts.
fn seed_summary() -> RepoResult<(usize, usize)> {
    let mut repo = InMemoryUserRepository::new();
    repo.load_sample_data()?;
    let service = UserService::new(repo);

    let users = service.count()?;
    let active = service.repository().find_active_users()?.len();
    Ok((users, active))
}
