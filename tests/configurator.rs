use content_dashboard::dashboard::config::{default_widgets, WIDGETS_STORAGE_KEY};
use content_dashboard::dashboard::layout::{reorder_widgets, set_enabled};
use content_dashboard::dashboard::{ConfiguratorEvent, WidgetConfigStore, WidgetConfigurator};
use content_dashboard::storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};
use std::sync::Arc;
use tempfile::tempdir;

fn open_store(storage: &SharedStore) -> WidgetConfigStore {
    let mut store = WidgetConfigStore::new(Some(storage.clone()));
    store.load_widgets();
    store
}

#[test]
fn cancel_leaves_canonical_collection_untouched() {
    let storage = MemoryStore::shared();
    let store = open_store(&storage);
    let before = store.widgets().to_vec();
    let persisted_before = storage.get(WIDGETS_STORAGE_KEY).unwrap();

    let mut configurator = WidgetConfigurator::default();
    configurator.open(&store);
    configurator.toggle("trending-highlight");
    assert!(configurator.is_dirty());
    configurator.cancel();

    assert!(!configurator.is_open());
    assert_eq!(store.widgets(), before.as_slice());
    assert_eq!(storage.get(WIDGETS_STORAGE_KEY).unwrap(), persisted_before);
}

#[test]
fn save_commit_survives_reload_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    {
        let storage: SharedStore = Arc::new(FileStore::open(&path).unwrap());
        let mut store = open_store(&storage);
        let mut configurator = WidgetConfigurator::default();
        configurator.open(&store);
        assert_eq!(configurator.toggle("continue-watching"), Some(false));
        assert!(configurator.save(&mut store));
        assert!(!configurator.is_dirty());
        configurator.cancel();
        let watching = store
            .widgets()
            .iter()
            .find(|w| w.id == "continue-watching")
            .unwrap();
        assert!(!watching.enabled);
    }

    let storage: SharedStore = Arc::new(FileStore::open(&path).unwrap());
    let store = open_store(&storage);
    let watching = store
        .widgets()
        .iter()
        .find(|w| w.id == "continue-watching")
        .unwrap();
    assert!(!watching.enabled);
}

#[test]
fn reset_discards_staged_and_customised_state() {
    let storage = MemoryStore::shared();
    let mut store = open_store(&storage);
    let customised = reorder_widgets(store.widgets(), "personalized-feed", Some("stats-overview"))
        .unwrap();
    store.save_widgets(set_enabled(&customised, "trending-highlight", false));
    assert_ne!(store.widgets(), default_widgets().as_slice());

    let mut configurator = WidgetConfigurator::default();
    configurator.open(&store);
    configurator.toggle("stats-overview");
    assert!(configurator.is_dirty());

    assert_eq!(configurator.reset(&mut store), ConfiguratorEvent::Reset);
    assert!(!configurator.is_open());
    assert_eq!(store.widgets(), default_widgets().as_slice());

    let mut reloaded = WidgetConfigStore::new(Some(storage));
    assert_eq!(reloaded.load_widgets(), default_widgets().as_slice());
}

#[test]
fn baseline_follows_external_saves() {
    let storage = MemoryStore::shared();
    let mut store = open_store(&storage);
    let mut configurator = WidgetConfigurator::default();
    configurator.open(&store);

    store.save_widgets(set_enabled(store.widgets(), "stats-overview", false));
    configurator.sync(&store);
    assert!(!configurator.is_dirty());
    assert_eq!(configurator.staged().unwrap(), store.widgets());

    configurator.toggle("stats-overview");
    assert!(configurator.is_dirty());
    configurator.save(&mut store);
    assert!(store.widgets().iter().all(|w| w.enabled));
}
