use std::collections::BTreeSet;
use tempfile::TempDir;
use userstore_core::{
    InMemoryUserRepository, JsonFileUserRepository, RepoError, SqliteUserRepository, User,
    UserFilter, UserId, UserRepository,
};

type Opened = (Box<dyn UserRepository>, Option<TempDir>);

fn open_memory() -> Opened {
    (Box::new(InMemoryUserRepository::new()), None)
}

fn open_sqlite_memory() -> Opened {
    (Box::new(SqliteUserRepository::open_in_memory().unwrap()), None)
}

fn open_sqlite_file() -> Opened {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteUserRepository::open(dir.path().join("users.sqlite3")).unwrap();
    (Box::new(repo), Some(dir))
}

fn open_json_file() -> Opened {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileUserRepository::open(dir.path().join("users.json")).unwrap();
    (Box::new(repo), Some(dir))
}

fn ids(users: &[User]) -> Vec<UserId> {
    users.iter().filter_map(User::id).collect()
}

fn id_set(users: &[User]) -> BTreeSet<UserId> {
    users.iter().filter_map(User::id).collect()
}

fn check_example_scenario(repo: &mut dyn UserRepository) {
    let alice = repo.save(&User::new("Alice", "alice@x.com")).unwrap();
    let bob = repo.save(&User::new("Bob", "bob@y.com")).unwrap();
    assert_eq!(alice.id(), Some(1));
    assert_eq!(bob.id(), Some(2));

    let filter = UserFilter {
        min_id: Some(2),
        ..UserFilter::default()
    };
    let matched = repo.find_by_filter(&filter).unwrap();
    assert_eq!(ids(&matched), vec![2]);
    assert_eq!(matched[0].name(), "Bob");

    repo.delete_by_id(1).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
    assert!(!repo.exists_by_id(1).unwrap());
}

fn check_ids_are_never_reused(repo: &mut dyn UserRepository) {
    let first = repo.save(&User::new("First", "first@x")).unwrap();
    assert_eq!(first.id(), Some(1));
    repo.delete_by_id(1).unwrap();

    let second = repo.save(&User::new("Second", "second@x")).unwrap();
    assert_eq!(second.id(), Some(2));

    let third = repo.save(&User::new("Third", "third@x")).unwrap();
    assert_eq!(third.id(), Some(3));
}

fn check_created_user_reads_back(repo: &mut dyn UserRepository) {
    let mut draft = User::new("Dana", "dana@x.com");
    draft.deactivate();
    let saved = repo.save(&draft).unwrap();
    let id = saved.id().expect("save assigns an id");

    let loaded = repo.find_by_id(id).unwrap().expect("saved user is readable");
    assert_eq!(loaded, saved);
    assert_eq!(loaded.name(), "Dana");
    assert_eq!(loaded.email(), "dana@x.com");
    assert_eq!(loaded.created_at(), draft.created_at());
    assert!(!loaded.is_active());

    assert!(repo.find_by_id(id + 100).unwrap().is_none());
}

fn check_empty_filter_matches_find_all(repo: &mut dyn UserRepository) {
    assert!(repo.find_by_filter(&UserFilter::default()).unwrap().is_empty());

    for name in ["a", "b", "c"] {
        repo.save(&User::new(name, format!("{name}@x"))).unwrap();
    }
    repo.update_user_status(2, false).unwrap();

    let all = repo.find_all().unwrap();
    let filtered = repo.find_by_filter(&UserFilter::default()).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(id_set(&all), id_set(&filtered));
}

fn check_active_filter_matches_find_active_users(repo: &mut dyn UserRepository) {
    for name in ["a", "b", "c", "d"] {
        repo.save(&User::new(name, format!("{name}@x"))).unwrap();
    }
    repo.update_user_status(1, false).unwrap();
    repo.update_user_status(3, false).unwrap();
    repo.update_user_status(3, true).unwrap();

    let filtered = repo.find_by_filter(&UserFilter::active_only()).unwrap();
    let active = repo.find_active_users().unwrap();
    assert_eq!(id_set(&filtered), id_set(&active));
    assert_eq!(id_set(&active), BTreeSet::from([2, 3, 4]));
}

fn check_delete_absent_is_noop(repo: &mut dyn UserRepository) {
    repo.save(&User::new("Keep", "keep@x")).unwrap();
    repo.delete_by_id(42).unwrap();
    repo.delete_by_id(42).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
}

fn check_exists_tracks_save_and_delete(repo: &mut dyn UserRepository) {
    let saved = repo.save(&User::new("Eve", "eve@x")).unwrap();
    let id = saved.id().unwrap();
    assert!(repo.exists_by_id(id).unwrap());

    repo.delete_by_id(id).unwrap();
    assert!(!repo.exists_by_id(id).unwrap());
    assert_eq!(repo.count().unwrap(), 0);
}

fn check_explicit_id_overwrites_in_place(repo: &mut dyn UserRepository) {
    let saved = repo.save(&User::new("Frank", "frank@x")).unwrap();
    repo.save(&User::new("Grace", "grace@x")).unwrap();
    let id = saved.id().unwrap();

    let mut edited = saved.clone();
    edited.set_name("Franklin");
    edited.set_email("franklin@x");
    edited.deactivate();
    let overwritten = repo.save(&edited).unwrap();
    assert_eq!(overwritten.id(), Some(id));

    assert_eq!(repo.count().unwrap(), 2);
    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name(), "Franklin");
    assert_eq!(loaded.email(), "franklin@x");
    assert!(!loaded.is_active());
}

fn check_explicit_new_id_is_inserted_and_reserved(repo: &mut dyn UserRepository) {
    let explicit = repo.save(&User::with_id(7, "Seven", "seven@x")).unwrap();
    assert_eq!(explicit.id(), Some(7));
    assert_eq!(repo.count().unwrap(), 1);

    let next = repo.save(&User::new("After", "after@x")).unwrap();
    assert_eq!(next.id(), Some(8));
}

fn check_explicit_max_id_upserts(repo: &mut dyn UserRepository) {
    repo.save(&User::new("First", "first@x")).unwrap();

    let max = repo.save(&User::with_id(UserId::MAX, "Max", "max@x")).unwrap();
    assert_eq!(max.id(), Some(UserId::MAX));
    assert_eq!(repo.count().unwrap(), 2);

    let mut edited = max.clone();
    edited.set_name("Maximum");
    repo.save(&edited).unwrap();
    assert_eq!(repo.count().unwrap(), 2);
    let loaded = repo.find_by_id(UserId::MAX).unwrap().unwrap();
    assert_eq!(loaded.name(), "Maximum");

    assert!(repo.save(&User::new("Late", "late@x")).is_err());
    assert_eq!(repo.count().unwrap(), 2);
    assert_eq!(ids(&repo.find_all().unwrap()), vec![1, UserId::MAX]);
}

fn check_name_and_email_lookups_are_exact(repo: &mut dyn UserRepository) {
    repo.save(&User::new("Ann", "ann@x")).unwrap();
    repo.save(&User::new("Anna", "anna@x")).unwrap();
    repo.save(&User::new("Ann", "ann2@x")).unwrap();

    assert_eq!(ids(&repo.find_by_name("Ann").unwrap()), vec![1, 3]);
    assert!(repo.find_by_name("ann").unwrap().is_empty());
    assert_eq!(ids(&repo.find_by_email("anna@x").unwrap()), vec![2]);
    assert!(repo.find_by_email("ANNA@x").unwrap().is_empty());

    let substring = UserFilter {
        name_like: "Ann".to_string(),
        ..UserFilter::default()
    };
    assert_eq!(ids(&repo.find_by_filter(&substring).unwrap()), vec![1, 2, 3]);
}

fn check_filter_combines_all_criteria(repo: &mut dyn UserRepository) {
    for name in ["Alice", "alicia", "Malice", "Bob", "Alina"] {
        repo.save(&User::new(name, format!("{name}@x"))).unwrap();
    }
    repo.update_user_status(3, false).unwrap();

    let filter = UserFilter {
        active: Some(true),
        min_id: Some(1),
        max_id: Some(4),
        name_like: "li".to_string(),
    };
    assert_eq!(ids(&repo.find_by_filter(&filter).unwrap()), vec![1, 2]);

    let case_sensitive = UserFilter {
        name_like: "Ali".to_string(),
        ..UserFilter::default()
    };
    assert_eq!(ids(&repo.find_by_filter(&case_sensitive).unwrap()), vec![1, 5]);
}

fn check_update_status_on_missing_id_is_not_found(repo: &mut dyn UserRepository) {
    let err = repo.update_user_status(99, false).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(99)));
    assert_eq!(repo.count().unwrap(), 0);
}

fn check_returned_users_are_copies(repo: &mut dyn UserRepository) {
    let mut saved = repo.save(&User::new("Heidi", "heidi@x")).unwrap();
    saved.set_name("Mallory");

    let mut listed = repo.find_all().unwrap();
    listed[0].deactivate();

    let loaded = repo.find_by_id(1).unwrap().unwrap();
    assert_eq!(loaded.name(), "Heidi");
    assert!(loaded.is_active());
}

fn check_find_all_order_is_stable(repo: &mut dyn UserRepository) {
    for name in ["x", "y", "z"] {
        repo.save(&User::new(name, format!("{name}@x"))).unwrap();
    }
    let first = ids(&repo.find_all().unwrap());
    let second = ids(&repo.find_all().unwrap());
    assert_eq!(first, second);
    assert_eq!(first, vec![1, 2, 3]);
}

macro_rules! repository_contract {
    ($backend:ident, $open:path) => {
        mod $backend {
            use super::*;

            fn run(check: fn(&mut dyn UserRepository)) {
                let (mut repo, _guard) = $open();
                check(repo.as_mut());
            }

            #[test]
            fn example_scenario() {
                run(check_example_scenario);
            }

            #[test]
            fn ids_are_never_reused() {
                run(check_ids_are_never_reused);
            }

            #[test]
            fn created_user_reads_back() {
                run(check_created_user_reads_back);
            }

            #[test]
            fn empty_filter_matches_find_all() {
                run(check_empty_filter_matches_find_all);
            }

            #[test]
            fn active_filter_matches_find_active_users() {
                run(check_active_filter_matches_find_active_users);
            }

            #[test]
            fn delete_absent_is_noop() {
                run(check_delete_absent_is_noop);
            }

            #[test]
            fn exists_tracks_save_and_delete() {
                run(check_exists_tracks_save_and_delete);
            }

            #[test]
            fn explicit_id_overwrites_in_place() {
                run(check_explicit_id_overwrites_in_place);
            }

            #[test]
            fn explicit_new_id_is_inserted_and_reserved() {
                run(check_explicit_new_id_is_inserted_and_reserved);
            }

            #[test]
            fn explicit_max_id_upserts() {
                run(check_explicit_max_id_upserts);
            }

            #[test]
            fn name_and_email_lookups_are_exact() {
                run(check_name_and_email_lookups_are_exact);
            }

            #[test]
            fn filter_combines_all_criteria() {
                run(check_filter_combines_all_criteria);
            }

            #[test]
            fn update_status_on_missing_id_is_not_found() {
                run(check_update_status_on_missing_id_is_not_found);
            }

            #[test]
            fn returned_users_are_copies() {
                run(check_returned_users_are_copies);
            }

            #[test]
            fn find_all_order_is_stable() {
                run(check_find_all_order_is_stable);
            }
        }
    };
}

repository_contract!(memory, open_memory);
repository_contract!(sqlite_memory, open_sqlite_memory);
repository_contract!(sqlite_file, open_sqlite_file);
repository_contract!(json_file, open_json_file);
