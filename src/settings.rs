use crate::dashboard::ViewMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving log output instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Location of the key-value storage file. If `None`, a platform default
    /// is used.
    #[serde(default)]
    pub storage_path: Option<String>,
    /// View mode shown when the dashboard opens.
    #[serde(default)]
    pub default_view_mode: ViewMode,
    #[serde(default)]
    pub compact_by_default: bool,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Simulated latency for loading the content catalog.
    #[serde(default = "default_content_latency_ms")]
    pub content_latency_ms: u64,
    /// Seed for the generated content catalog.
    #[serde(default = "default_content_seed")]
    pub content_seed: u64,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(i32, i32)>,
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

fn default_content_latency_ms() -> u64 {
    600
}

fn default_content_seed() -> u64 {
    42
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            storage_path: None,
            default_view_mode: ViewMode::default(),
            compact_by_default: false,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            content_latency_ms: default_content_latency_ms(),
            content_seed: default_content_seed(),
            window_size: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the storage file, preferring the configured path.
    pub fn storage_path(&self) -> PathBuf {
        if let Some(path) = self.storage_path.as_deref().filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(path);
        }
        dirs_next::data_local_dir()
            .map(|dir| dir.join("content-dashboard").join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("storage.json"))
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.enable_toasts);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "default_view_mode": "feed", "storage_path": "/tmp/s.json" }"#,
        )
        .unwrap();
        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.default_view_mode, ViewMode::Feed);
        assert_eq!(settings.storage_path(), PathBuf::from("/tmp/s.json"));
        assert_eq!(settings.content_seed, 42);
        assert!(settings.log_file().is_none());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path = path.to_str().unwrap();
        let settings = Settings {
            compact_by_default: true,
            toast_duration: 5.0,
            ..Settings::default()
        };
        settings.save(path).unwrap();
        assert_eq!(Settings::load(path).unwrap(), settings);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(Settings::load(path.to_str().unwrap()).is_err());
    }
}
