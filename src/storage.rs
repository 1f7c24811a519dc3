//! Key-value persistence used by the dashboard stores.
//!
//! Every store writes synchronously: when `set` returns, the value is durable
//! (or the error has been reported to the caller).

use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Narrow persistence port: string values addressed by string keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Process-local store. Used by tests and as the fallback when the storage
/// file cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let map = self
            .map
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in a single JSON object file which is rewritten in full on
/// every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. Only a missing or empty file is an empty
    /// store; a file that cannot be read or is not a JSON object of strings is
    /// an error.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read storage file {}", path.display()))
            }
        };
        let map = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("invalid storage file {}", path.display()))?
        };
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, map: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(map)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to finalize {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let map = self
            .map
            .lock()
            .map_err(|_| anyhow::anyhow!("file store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| anyhow::anyhow!("file store lock poisoned"))?;
        let previous = map.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write(&map) {
            // Keep memory and disk in agreement when the write fails.
            match previous {
                Some(prev) => map.insert(key.to_string(), prev),
                None => map.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// Open the file store at `path`, falling back to an in-memory store when the
/// file is unreadable. The returned flag is `true` when the fallback was used.
pub fn open_or_memory(path: impl AsRef<Path>) -> (SharedStore, bool) {
    match FileStore::open(path.as_ref()) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "opened storage file");
            (Arc::new(store), false)
        }
        Err(e) => {
            tracing::warn!(error = %e, "storage unavailable; using in-memory store");
            (MemoryStore::shared(), true)
        }
    }
}
