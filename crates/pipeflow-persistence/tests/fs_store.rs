use pipeflow_core::{CacheKey, CacheStore};
use pipeflow_persistence::fs::ENTRY_EXTENSION;
use pipeflow_persistence::FsCacheStore;
use tempfile::TempDir;

#[test]
fn save_load_and_overwrite_in_place() {
    let dir = TempDir::new().unwrap();
    let store = FsCacheStore::open(dir.path()).unwrap();
    let key = CacheKey::new("wf", "D");

    assert_eq!(store.load(&key).unwrap(), None);
    store.save(&key, b"first").unwrap();
    store.save(&key, b"second").unwrap();

    assert_eq!(store.load(&key).unwrap().as_deref(), Some(&b"second"[..]));
    assert_eq!(store.number_of_saved_entries().unwrap(), 1);
    assert_eq!(store.entry_count().unwrap(), 1);
}

#[test]
fn entries_are_sharded_by_fingerprint_prefix() {
    let dir = TempDir::new().unwrap();
    let store = FsCacheStore::open(dir.path()).unwrap();
    let key = CacheKey::new("wf", "B");
    store.save(&key, b"{}").unwrap();

    let path = store.entry_path(&key);
    let fp = key.fingerprint();
    assert!(path.is_file());
    assert_eq!(path.file_name().unwrap().to_string_lossy(), format!("{fp}.{ENTRY_EXTENSION}"));
    assert_eq!(path.parent().unwrap().file_name().unwrap().to_string_lossy(), &fp[..2]);
}

#[test]
fn keys_differing_only_by_workflow_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let store = FsCacheStore::open(dir.path()).unwrap();
    store.save(&CacheKey::new("one", "D"), b"1").unwrap();
    store.save(&CacheKey::new("two", "D"), b"2").unwrap();

    assert_eq!(store.number_of_saved_entries().unwrap(), 2);
    assert_eq!(store.load(&CacheKey::new("one", "D")).unwrap().as_deref(), Some(&b"1"[..]));
}

#[test]
fn remove_and_clear() {
    let dir = TempDir::new().unwrap();
    let store = FsCacheStore::open(dir.path()).unwrap();
    let key = CacheKey::new("wf", "C");
    store.save(&key, b"x").unwrap();
    store.save(&CacheKey::new("wf", "D"), b"y").unwrap();

    assert!(store.remove(&key).unwrap());
    assert!(!store.remove(&key).unwrap());
    assert!(!store.contains(&key));
    assert_eq!(store.number_of_saved_entries().unwrap(), 1);

    store.clear().unwrap();
    assert_eq!(store.number_of_saved_entries().unwrap(), 0);
    assert!(store.root().is_dir());
}

#[test]
fn temporary_stores_get_distinct_timestamped_dirs() {
    let parent = TempDir::new().unwrap();
    let first = FsCacheStore::temporary_in(parent.path()).unwrap();
    let second = FsCacheStore::temporary_in(parent.path()).unwrap();

    assert_ne!(first.root(), second.root());
    for store in [&first, &second] {
        assert!(store.root().starts_with(parent.path()));
        let name = store.root().file_name().unwrap().to_string_lossy().to_string();
        // YYYY-MM-DD_HH-MM-SS_xxxxxxxx
        assert_eq!(name.len(), 19 + 1 + 8, "{name}");
        assert_eq!(store.number_of_saved_entries().unwrap(), 0);
    }
}
