use crate::dashboard::config::{
    default_widgets, sanitize, PersistedWidgets, WidgetConfig, WIDGETS_STORAGE_KEY,
};
use crate::storage::{KeyValueStore, SharedStore};

/// Single owner of the canonical widget collection.
///
/// All mutation goes through [`save_widgets`](Self::save_widgets) or
/// [`reset_widgets`](Self::reset_widgets), which replace the whole collection
/// and write it to storage before returning. Storage problems are logged and
/// never returned to the caller; without storage the store is memory-only.
pub struct WidgetConfigStore {
    storage: Option<SharedStore>,
    widgets: Vec<WidgetConfig>,
    revision: u64,
    warnings: Vec<String>,
}

impl WidgetConfigStore {
    pub fn new(storage: Option<SharedStore>) -> Self {
        Self {
            storage,
            widgets: default_widgets(),
            revision: 0,
            warnings: Vec::new(),
        }
    }

    /// Memory-only store, as used when no storage backend is available.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub fn widgets(&self) -> &[WidgetConfig] {
        &self.widgets
    }

    /// Incremented on every load, save and reset.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Problems found while loading the persisted collection.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    /// Read the persisted collection, installing the default set when it is
    /// absent or cannot be parsed.
    pub fn load_widgets(&mut self) -> &[WidgetConfig] {
        self.warnings.clear();
        let stored = match &self.storage {
            Some(storage) => match storage.get(WIDGETS_STORAGE_KEY) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read widget config");
                    None
                }
            },
            None => None,
        };

        let Some(content) = stored.filter(|c| !c.trim().is_empty()) else {
            tracing::debug!("no stored widget config; installing defaults");
            self.install(default_widgets());
            return &self.widgets;
        };

        match PersistedWidgets::parse(&content) {
            Ok((persisted, migrated)) => {
                let mut widgets = persisted.widgets;
                let warnings = sanitize(&mut widgets);
                for w in &warnings {
                    tracing::warn!("{w}");
                }
                let repaired = !warnings.is_empty();
                self.warnings = warnings;
                if migrated || repaired {
                    tracing::info!(migrated, repaired, "rewriting stored widget config");
                    self.install(widgets);
                } else {
                    self.widgets = widgets;
                    self.revision += 1;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "stored widget config is invalid; using defaults");
                self.warnings
                    .push(format!("stored widget config was invalid: {e}"));
                self.install(default_widgets());
            }
        }
        &self.widgets
    }

    /// Replace the canonical collection and persist it in full. Records with
    /// an empty or repeated id are dropped first so ids stay unique.
    pub fn save_widgets(&mut self, mut widgets: Vec<WidgetConfig>) {
        for w in sanitize(&mut widgets) {
            tracing::warn!("{w}");
        }
        self.install(widgets);
    }

    /// Replace the canonical collection with the default set and persist it.
    pub fn reset_widgets(&mut self) {
        tracing::info!("resetting widgets to defaults");
        self.install(default_widgets());
    }

    fn install(&mut self, widgets: Vec<WidgetConfig>) {
        self.widgets = widgets;
        self.revision += 1;
        self.persist();
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let json = match PersistedWidgets::new(self.widgets.clone()).to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize widget config");
                return;
            }
        };
        if let Err(e) = storage.set(WIDGETS_STORAGE_KEY, &json) {
            tracing::warn!(error = %e, "failed to persist widget config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::config::{WidgetKind, WidgetSpan, WidgetType};
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("read failed")
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("write failed")
        }
    }

    #[test]
    fn memory_only_store_behaves_in_memory() {
        let mut store = WidgetConfigStore::in_memory();
        assert_eq!(store.load_widgets(), default_widgets().as_slice());
        let mut next = store.widgets().to_vec();
        next[0].enabled = false;
        store.save_widgets(next.clone());
        assert_eq!(store.widgets(), next.as_slice());
        assert!(!store.has_storage());
    }

    #[test]
    fn failing_storage_degrades_to_defaults() {
        let mut store = WidgetConfigStore::new(Some(Arc::new(FailingStore)));
        assert_eq!(store.load_widgets(), default_widgets().as_slice());
        store.save_widgets(Vec::new());
        assert!(store.widgets().is_empty());
    }

    #[test]
    fn revision_advances_on_every_write() {
        let mut store = WidgetConfigStore::new(Some(MemoryStore::shared()));
        let r0 = store.revision();
        store.load_widgets();
        let r1 = store.revision();
        store.save_widgets(default_widgets());
        let r2 = store.revision();
        store.reset_widgets();
        assert!(r0 < r1 && r1 < r2 && r2 < store.revision());
    }

    #[test]
    fn save_drops_empty_and_duplicate_ids() {
        let storage = MemoryStore::shared();
        let mut store = WidgetConfigStore::new(Some(storage.clone()));
        store.load_widgets();
        store.save_widgets(vec![
            WidgetConfig::new("a", WidgetKind::StatsOverview, 0),
            WidgetConfig::new("", WidgetKind::ContinueWatching, 1),
            WidgetConfig::new("a", WidgetKind::PersonalizedFeed, 2),
            WidgetConfig::new("b", WidgetKind::TrendingHighlight, 3),
        ]);
        let ids: Vec<&str> = store.widgets().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            store.widgets()[0].widget_type,
            WidgetType::Known(WidgetKind::StatsOverview)
        );

        let raw = storage.get(WIDGETS_STORAGE_KEY).unwrap().unwrap();
        let (persisted, _) = PersistedWidgets::parse(&raw).unwrap();
        assert_eq!(persisted.widgets, store.widgets());
    }

    #[test]
    fn repaired_records_are_written_back() {
        let storage = MemoryStore::shared();
        let widgets = vec![
            WidgetConfig::new("a", WidgetKind::StatsOverview, 0).with_span(WidgetSpan::new(0, 1)),
            WidgetConfig::new("a", WidgetKind::StatsOverview, 1),
        ];
        storage
            .set(
                WIDGETS_STORAGE_KEY,
                &json!({ "version": 1, "widgets": widgets }).to_string(),
            )
            .unwrap();
        let mut store = WidgetConfigStore::new(Some(storage.clone()));
        assert_eq!(store.load_widgets().len(), 1);
        assert_eq!(store.warnings().len(), 2);

        let raw = storage.get(WIDGETS_STORAGE_KEY).unwrap().unwrap();
        let (persisted, _) = PersistedWidgets::parse(&raw).unwrap();
        assert_eq!(persisted.widgets.len(), 1);
        assert_eq!(persisted.widgets[0].span, WidgetSpan::SMALL);
    }
}
