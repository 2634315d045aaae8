use presetctl::engine::{JsonFileStore, MemoryStore, Preset, PresetStore, Slot, StoreError};
use std::sync::Arc;

use crate::common::helpers::{names, preset, temp_store_dir, tuned_preset};

fn sample_list() -> Vec<Preset> {
    vec![tuned_preset("Zeta"), preset("Alpha"), tuned_preset("Mid")]
}

async fn assert_roundtrip(store: &dyn PresetStore) {
    let presets = sample_list();
    store.save_all(&presets).await.unwrap();

    let loaded = store.load_all().await.unwrap();
    assert_eq!(names(&loaded), ["Alpha", "Mid", "Zeta"]);
    for p in &presets {
        assert!(loaded.contains(p), "{} lost in round trip", p.name);
    }

    let current = tuned_preset("Current");
    store.save_current(&current).await.unwrap();
    assert_eq!(store.load_current().await.unwrap(), current);
}

#[tokio::test]
async fn test_file_store_roundtrip() {
    let temp_dir = temp_store_dir();
    let store = JsonFileStore::new(temp_dir.path());
    assert_roundtrip(&store).await;
}

#[tokio::test]
async fn test_memory_store_roundtrip() {
    assert_roundtrip(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_empty_list_when_nothing_saved() {
    let temp_dir = temp_store_dir();
    let store = JsonFileStore::new(temp_dir.path());

    assert!(store.load_all().await.unwrap().is_empty());
    assert!(matches!(
        store.load_current().await,
        Err(StoreError::NotFound(Slot::Current))
    ));
}

#[tokio::test]
async fn test_concurrent_saves_never_tear() {
    let temp_dir = temp_store_dir();
    let store = Arc::new(JsonFileStore::new(temp_dir.path()));

    let first = vec![preset("One")];
    let second = sample_list();

    let (a, b) = tokio::join!(store.save_all(&first), store.save_all(&second));
    a.unwrap();
    b.unwrap();

    let loaded = store.load_all().await.unwrap();
    assert!(
        names(&loaded) == ["One"] || names(&loaded) == ["Alpha", "Mid", "Zeta"],
        "unexpected list {:?}",
        names(&loaded)
    );

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_reports_slot() {
    let temp_dir = temp_store_dir();
    let store = JsonFileStore::new(temp_dir.path());
    std::fs::write(store.slot_path(Slot::List), b"{ not json").unwrap();

    let err = store.load_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Serialize { slot: Slot::List, .. }));
}
