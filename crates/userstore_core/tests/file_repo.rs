use userstore_core::{JsonFileUserRepository, RepoError, User, UserRepository};

#[test]
fn open_creates_empty_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");

    let repo = JsonFileUserRepository::open(&path).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
    assert_eq!(repo.path(), path.as_path());

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["next_id"], 1);
    assert_eq!(raw["users"], serde_json::json!([]));
}

#[test]
fn reopen_restores_users_and_id_counter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");

    {
        let mut repo = JsonFileUserRepository::open(&path).unwrap();
        repo.save(&User::new("Alice", "alice@x.com")).unwrap();
        repo.save(&User::new("Bob", "bob@y.com")).unwrap();
        repo.update_user_status(1, false).unwrap();
        repo.delete_by_id(2).unwrap();
    }

    let mut repo = JsonFileUserRepository::open(&path).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
    let alice = repo.find_by_id(1).unwrap().unwrap();
    assert_eq!(alice.name(), "Alice");
    assert!(!alice.is_active());

    let next = repo.save(&User::new("Carol", "carol@x")).unwrap();
    assert_eq!(next.id(), Some(3));
}

#[test]
fn reopen_keeps_exhausted_id_counter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");

    {
        let mut repo = JsonFileUserRepository::open(&path).unwrap();
        repo.save(&User::with_id(i64::MAX, "Max", "max@x")).unwrap();
    }

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert!(raw["next_id"].is_null());

    let mut repo = JsonFileUserRepository::open(&path).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
    let err = repo.save(&User::new("Late", "late@x")).unwrap_err();
    assert!(matches!(err, RepoError::InvalidInput(_)));
}

#[test]
fn corrupt_snapshot_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let err = JsonFileUserRepository::open(&path)
        .err()
        .expect("corrupt file must be rejected");
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn snapshot_with_duplicate_ids_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let user = User::from_parts(1, "Dup", "dup@x", 0, true);
    let raw = serde_json::json!({ "next_id": 2, "users": [user, user] });
    std::fs::write(&path, raw.to_string()).unwrap();

    let err = JsonFileUserRepository::open(&path)
        .err()
        .expect("duplicate ids must be rejected");
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn failed_write_keeps_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let mut repo = JsonFileUserRepository::open(&path).unwrap();
    repo.save(&User::new("Alice", "alice@x.com")).unwrap();

    // A directory at the temp path makes the snapshot write fail.
    std::fs::create_dir(dir.path().join("users.json.tmp")).unwrap();

    let err = repo.save(&User::new("Bob", "bob@y.com")).unwrap_err();
    assert!(matches!(err, RepoError::Io(_)));
    assert_eq!(repo.count().unwrap(), 1);
    assert!(!repo.exists_by_id(2).unwrap());
}
