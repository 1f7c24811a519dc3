//! Mock content model backing the consumer dashboard.

pub mod bookmarks;
pub mod catalog;
pub mod loader;

pub use bookmarks::BookmarkStore;
pub use loader::ContentLoader;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Twitch,
    Podcast,
    Blog,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::YouTube,
        Platform::Twitch,
        Platform::Podcast,
        Platform::Blog,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Twitch => "Twitch",
            Platform::Podcast => "Podcast",
            Platform::Blog => "Blog",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub platform: Platform,
    pub followed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub creator_id: String,
    pub creator_name: String,
    pub platform: Platform,
    pub published_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub views: u64,
}

/// Watch progress for one item, `progress` in `0.0..=1.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchEntry {
    pub item_id: String,
    pub progress: f32,
    pub last_watched: DateTime<Utc>,
}

impl WatchEntry {
    pub fn is_finished(&self) -> bool {
        self.progress >= 0.98
    }
}

/// Everything the widgets and the feed panel render from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSnapshot {
    pub creators: Vec<Creator>,
    /// Items from followed creators, newest first.
    pub feed: Vec<ContentItem>,
    /// All items, most viewed first.
    pub trending: Vec<ContentItem>,
    /// Most recently watched first.
    pub watch_history: Vec<WatchEntry>,
}

impl ContentSnapshot {
    pub fn item(&self, id: &str) -> Option<&ContentItem> {
        self.trending.iter().find(|item| item.id == id)
    }

    pub fn followed_creators(&self) -> usize {
        self.creators.iter().filter(|c| c.followed).count()
    }

    /// Unfinished history entries paired with their items.
    pub fn in_progress(&self) -> Vec<(&WatchEntry, &ContentItem)> {
        self.watch_history
            .iter()
            .filter(|entry| !entry.is_finished())
            .filter_map(|entry| self.item(&entry.item_id).map(|item| (entry, item)))
            .collect()
    }

    /// Minutes watched across the whole history.
    pub fn minutes_watched(&self) -> u32 {
        self.watch_history
            .iter()
            .filter_map(|entry| {
                self.item(&entry.item_id)
                    .map(|item| (item.duration_minutes as f32 * entry.progress.clamp(0.0, 1.0)) as u32)
            })
            .sum()
    }
}

/// Compact human readable view count, e.g. `12.3K`.
pub fn format_views(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K", views as f64 / 1_000.0)
    } else {
        views.to_string()
    }
}
