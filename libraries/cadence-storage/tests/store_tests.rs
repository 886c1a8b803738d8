//! Integration tests for the durable session store

use cadence_core::KeyValueStore;
use cadence_storage::{MemoryStore, RedbStore};
use tempfile::TempDir;

fn temp_store() -> (TempDir, RedbStore) {
    let dir = TempDir::new().unwrap();
    let store = RedbStore::open(dir.path().join("session.redb")).unwrap();
    (dir, store)
}

#[test]
fn test_missing_key_reads_none() {
    let (_dir, store) = temp_store();
    assert_eq!(store.get("player_volume").unwrap(), None);
}

#[test]
fn test_set_then_get() {
    let (_dir, mut store) = temp_store();
    store.set("player_volume", "0.3").unwrap();
    assert_eq!(store.get("player_volume").unwrap().as_deref(), Some("0.3"));
}

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.redb");

    {
        let mut store = RedbStore::open(&path).unwrap();
        store.set("shuffle", "true").unwrap();
        store
            .set("played_history", r#"[{"index":2,"timestamp":"2026-01-01T00:00:00Z"}]"#)
            .unwrap();
    }

    let store = RedbStore::open(&path).unwrap();
    assert_eq!(store.get("shuffle").unwrap().as_deref(), Some("true"));
    assert!(store
        .get("played_history")
        .unwrap()
        .unwrap()
        .contains(r#""index":2"#));
}

#[test]
fn test_remove_deletes_value() {
    let (_dir, mut store) = temp_store();
    store.set("token", "abc").unwrap();
    store.remove("token").unwrap();
    assert_eq!(store.get("token").unwrap(), None);

    // Removing again is fine
    store.remove("token").unwrap();
}

#[test]
fn test_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("session.redb");

    let store = RedbStore::open(&path).unwrap();
    assert_eq!(store.path(), path.as_path());
    assert!(path.exists());
}

#[test]
fn test_stores_are_interchangeable_behind_trait_object() {
    let (_dir, redb) = temp_store();
    let mut stores: Vec<Box<dyn KeyValueStore>> = vec![Box::new(MemoryStore::new()), Box::new(redb)];

    for store in &mut stores {
        store.set("current_duration", "42").unwrap();
        assert_eq!(store.get("current_duration").unwrap().as_deref(), Some("42"));
    }
}
