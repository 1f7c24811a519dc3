use crate::storage::{KeyValueStore, SharedStore};
use std::collections::BTreeSet;

pub const BOOKMARKS_STORAGE_KEY: &str = "content-dashboard.bookmarks";

/// Bookmarked item ids. Like the widget store, every change writes the whole
/// set and failures only degrade to memory.
pub struct BookmarkStore {
    storage: Option<SharedStore>,
    ids: BTreeSet<String>,
}

impl BookmarkStore {
    pub fn load(storage: Option<SharedStore>) -> Self {
        let ids = storage
            .as_ref()
            .and_then(|s| match s.get(BOOKMARKS_STORAGE_KEY) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read bookmarks");
                    None
                }
            })
            .and_then(|raw| match serde_json::from_str::<BTreeSet<String>>(&raw) {
                Ok(ids) => Some(ids),
                Err(e) => {
                    tracing::warn!(error = %e, "stored bookmarks are invalid; starting empty");
                    None
                }
            })
            .unwrap_or_default();
        Self { storage, ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip the bookmark for `id`; returns whether it is now bookmarked.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_set = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.persist();
        now_set
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        match serde_json::to_string(&self.ids) {
            Ok(json) => {
                if let Err(e) = storage.set(BOOKMARKS_STORAGE_KEY, &json) {
                    tracing::warn!(error = %e, "failed to persist bookmarks");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize bookmarks"),
        }
    }
}
