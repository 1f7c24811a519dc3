use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fmt;

/// Storage key holding the persisted widget collection.
pub const WIDGETS_STORAGE_KEY: &str = "content-dashboard.widgets";

/// Version written into the persisted envelope.
pub const CONFIG_VERSION: u32 = 1;

fn default_span() -> u8 {
    1
}

fn default_enabled() -> bool {
    true
}

/// Built-in widget kinds. Every kind has exactly one renderer registered in
/// [`crate::dashboard::widgets::WidgetRegistry::with_defaults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    PersonalizedFeed,
    ContinueWatching,
    TrendingHighlight,
    StatsOverview,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] = [
        WidgetKind::PersonalizedFeed,
        WidgetKind::ContinueWatching,
        WidgetKind::TrendingHighlight,
        WidgetKind::StatsOverview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::PersonalizedFeed => "personalized-feed",
            WidgetKind::ContinueWatching => "continue-watching",
            WidgetKind::TrendingHighlight => "trending-highlight",
            WidgetKind::StatsOverview => "stats-overview",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    pub fn default_title(self) -> &'static str {
        match self {
            WidgetKind::PersonalizedFeed => "Your Feed",
            WidgetKind::ContinueWatching => "Continue Watching",
            WidgetKind::TrendingHighlight => "Trending Now",
            WidgetKind::StatsOverview => "Your Stats",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WidgetKind::PersonalizedFeed => "Latest content from the creators you follow",
            WidgetKind::ContinueWatching => "Pick up unfinished videos and episodes",
            WidgetKind::TrendingHighlight => "Most viewed content across platforms",
            WidgetKind::StatsOverview => "Watch time, bookmarks and followed creators",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag stored on a widget record. Unrecognised tags are preserved so they
/// round-trip through storage and can be shown in a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetType {
    Known(WidgetKind),
    Unknown(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Known(kind) => kind.as_str(),
            WidgetType::Unknown(tag) => tag,
        }
    }

    pub fn kind(&self) -> Option<WidgetKind> {
        match self {
            WidgetType::Known(kind) => Some(*kind),
            WidgetType::Unknown(_) => None,
        }
    }
}

impl From<String> for WidgetType {
    fn from(tag: String) -> Self {
        match WidgetKind::parse(&tag) {
            Some(kind) => WidgetType::Known(kind),
            None => WidgetType::Unknown(tag),
        }
    }
}

impl From<&str> for WidgetType {
    fn from(tag: &str) -> Self {
        WidgetType::from(tag.to_string())
    }
}

impl From<WidgetType> for String {
    fn from(ty: WidgetType) -> Self {
        match ty {
            WidgetType::Known(kind) => kind.as_str().to_string(),
            WidgetType::Unknown(tag) => tag,
        }
    }
}

impl From<WidgetKind> for WidgetType {
    fn from(kind: WidgetKind) -> Self {
        WidgetType::Known(kind)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid footprint of a widget in columns and rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WidgetSpan {
    #[serde(default = "default_span")]
    pub cols: u8,
    #[serde(default = "default_span")]
    pub rows: u8,
}

impl WidgetSpan {
    pub const SMALL: WidgetSpan = WidgetSpan { cols: 1, rows: 1 };
    pub const LARGE: WidgetSpan = WidgetSpan { cols: 2, rows: 2 };

    pub fn new(cols: u8, rows: u8) -> Self {
        Self { cols, rows }
    }

    pub fn is_expanded(&self) -> bool {
        self.cols > 1 || self.rows > 1
    }
}

impl Default for WidgetSpan {
    fn default() -> Self {
        Self::SMALL
    }
}

/// A single persisted widget record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WidgetConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub span: WidgetSpan,
    #[serde(default = "empty_props")]
    pub props: Value,
}

fn empty_props() -> Value {
    Value::Object(Default::default())
}

impl WidgetConfig {
    pub fn new(id: &str, widget_type: impl Into<WidgetType>, position: u32) -> Self {
        let widget_type = widget_type.into();
        let title = widget_type
            .kind()
            .map(|k| k.default_title().to_string())
            .unwrap_or_else(|| id.to_string());
        Self {
            id: id.to_string(),
            widget_type,
            title,
            enabled: true,
            position,
            span: WidgetSpan::default(),
            props: empty_props(),
        }
    }

    pub fn with_span(mut self, span: WidgetSpan) -> Self {
        self.span = span;
        self
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The fixed set installed on first run and by reset-to-defaults.
pub fn default_widgets() -> Vec<WidgetConfig> {
    vec![
        WidgetConfig::new("personalized-feed", WidgetKind::PersonalizedFeed, 0)
            .with_span(WidgetSpan::new(2, 2))
            .with_props(json!({ "limit": 6, "show_summary": true })),
        WidgetConfig::new("continue-watching", WidgetKind::ContinueWatching, 1)
            .with_span(WidgetSpan::new(1, 2))
            .with_props(json!({ "limit": 4, "show_progress": true })),
        WidgetConfig::new("trending-highlight", WidgetKind::TrendingHighlight, 2)
            .with_span(WidgetSpan::new(2, 1))
            .with_props(json!({ "limit": 5 })),
        WidgetConfig::new("stats-overview", WidgetKind::StatsOverview, 3)
            .with_span(WidgetSpan::new(1, 1))
            .with_props(json!({ "show_bookmarks": true })),
    ]
}

/// On-disk layout of the widget collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedWidgets {
    pub version: u32,
    pub widgets: Vec<WidgetConfig>,
}

impl PersistedWidgets {
    pub fn new(widgets: Vec<WidgetConfig>) -> Self {
        Self {
            version: CONFIG_VERSION,
            widgets,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a persisted value. Accepts the versioned envelope as well as the
    /// bare array written before the envelope existed. The second element is
    /// `true` when the value was migrated and should be written back.
    pub fn parse(content: &str) -> anyhow::Result<(Self, bool)> {
        let raw: Value = serde_json::from_str(content)?;
        match raw {
            Value::Array(_) => {
                let widgets: Vec<WidgetConfig> = serde_json::from_value(raw)?;
                Ok((Self::new(widgets), true))
            }
            Value::Object(_) => {
                let persisted: PersistedWidgets = serde_json::from_value(raw)?;
                if persisted.version > CONFIG_VERSION {
                    anyhow::bail!(
                        "widget config version {} is newer than supported version {}",
                        persisted.version,
                        CONFIG_VERSION
                    );
                }
                let migrated = persisted.version < CONFIG_VERSION;
                Ok((Self::new(persisted.widgets), migrated))
            }
            other => anyhow::bail!("unexpected widget config value: {other}"),
        }
    }
}

/// Repair records that violate the collection invariants. Returns a warning
/// for every change made.
pub fn sanitize(widgets: &mut Vec<WidgetConfig>) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    widgets.retain(|w| {
        if w.id.trim().is_empty() {
            warnings.push(format!("widget of type '{}' without id dropped", w.widget_type));
            return false;
        }
        if !seen.insert(w.id.clone()) {
            warnings.push(format!("duplicate widget id '{}' dropped", w.id));
            return false;
        }
        true
    });
    for w in widgets.iter_mut() {
        if w.span.cols == 0 || w.span.rows == 0 {
            warnings.push(format!("widget '{}' had an empty span", w.id));
            w.span.cols = w.span.cols.max(1);
            w.span.rows = w.span.rows.max(1);
        }
        if w.props.is_null() {
            w.props = empty_props();
        }
    }
    warnings
}
