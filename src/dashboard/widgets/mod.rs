use crate::content::{ContentItem, ContentSnapshot};
use crate::dashboard::config::{WidgetKind, WidgetType};
use eframe::egui;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

mod continue_watching;
mod personalized_feed;
mod stats_overview;
mod trending_highlight;

pub use continue_watching::{ContinueWatchingConfig, ContinueWatchingWidget};
pub use personalized_feed::{PersonalizedFeedConfig, PersonalizedFeedWidget};
pub use stats_overview::{StatsOverviewConfig, StatsOverviewWidget};
pub use trending_highlight::{TrendingHighlightConfig, TrendingHighlightWidget};

/// Request raised by a widget in response to user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    OpenItem { item_id: String },
    ToggleBookmark { item_id: String },
}

/// Data shared with widgets at render time.
pub struct DashboardContext<'a> {
    pub content: &'a ContentSnapshot,
    pub bookmarks: &'a BTreeSet<String>,
    pub content_loaded: bool,
}

/// Widget trait implemented by all dashboard content renderers.
pub trait Widget: Send {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction>;

    /// Called when the props of an existing instance change.
    fn on_config_updated(&mut self, _props: &Value) {}
}

/// Builds widgets of one kind from JSON props.
#[derive(Clone)]
pub struct WidgetDescriptor {
    ctor: Arc<dyn Fn(&Value) -> Box<dyn Widget> + Send + Sync>,
    default_props: Arc<dyn Fn() -> Value + Send + Sync>,
    description: &'static str,
}

impl WidgetDescriptor {
    pub fn new<T, C>(build: fn(C) -> T, description: &'static str) -> Self
    where
        T: Widget + 'static,
        C: DeserializeOwned + Serialize + Default + 'static,
    {
        Self {
            ctor: Arc::new(move |v| {
                let cfg = serde_json::from_value::<C>(v.clone()).unwrap_or_default();
                Box::new(build(cfg))
            }),
            default_props: Arc::new(|| {
                serde_json::to_value(C::default()).unwrap_or_else(|_| json!({}))
            }),
            description,
        }
    }

    pub fn create(&self, props: &Value) -> Box<dyn Widget> {
        (self.ctor)(props)
    }

    pub fn default_props(&self) -> Value {
        (self.default_props)()
    }

    pub fn description(&self) -> &'static str {
        self.description
    }
}

/// Maps widget kinds to their renderers.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    map: HashMap<WidgetKind, WidgetDescriptor>,
}

impl WidgetRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        for kind in WidgetKind::ALL {
            reg.register(kind, default_descriptor(kind));
        }
        reg
    }

    pub fn register(&mut self, kind: WidgetKind, descriptor: WidgetDescriptor) {
        self.map.insert(kind, descriptor);
    }

    pub fn descriptor(&self, widget_type: &WidgetType) -> Option<&WidgetDescriptor> {
        widget_type.kind().and_then(|kind| self.map.get(&kind))
    }

    pub fn contains(&self, widget_type: &WidgetType) -> bool {
        self.descriptor(widget_type).is_some()
    }

    /// Build a renderer, or `None` when the type has no registered renderer.
    pub fn create(&self, widget_type: &WidgetType, props: &Value) -> Option<Box<dyn Widget>> {
        self.descriptor(widget_type).map(|d| d.create(props))
    }

    pub fn description(&self, widget_type: &WidgetType) -> Option<&'static str> {
        self.descriptor(widget_type).map(|d| d.description())
    }

    pub fn default_props(&self, widget_type: &WidgetType) -> Option<Value> {
        self.descriptor(widget_type).map(|d| d.default_props())
    }

    pub fn kinds(&self) -> Vec<WidgetKind> {
        let mut kinds: Vec<WidgetKind> = self.map.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

/// The renderer for each built-in kind. Adding a [`WidgetKind`] without a
/// match arm here does not compile.
fn default_descriptor(kind: WidgetKind) -> WidgetDescriptor {
    match kind {
        WidgetKind::PersonalizedFeed => {
            WidgetDescriptor::new(PersonalizedFeedWidget::new, kind.description())
        }
        WidgetKind::ContinueWatching => {
            WidgetDescriptor::new(ContinueWatchingWidget::new, kind.description())
        }
        WidgetKind::TrendingHighlight => {
            WidgetDescriptor::new(TrendingHighlightWidget::new, kind.description())
        }
        WidgetKind::StatsOverview => {
            WidgetDescriptor::new(StatsOverviewWidget::new, kind.description())
        }
    }
}

/// Text shown in place of a widget whose type has no renderer.
pub fn unknown_widget_message(widget_type: &WidgetType) -> String {
    format!("Unknown widget type: {widget_type}")
}

pub fn render_placeholder(ui: &mut egui::Ui, widget_type: &WidgetType) -> String {
    let message = unknown_widget_message(widget_type);
    let color = ui.visuals().warn_fg_color;
    ui.colored_label(color, &message);
    message
}

pub(crate) fn loading_label(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.weak("Loading content…");
    });
}

pub(crate) fn empty_label(ui: &mut egui::Ui, text: &str) {
    ui.weak(text);
}

/// One content line: bookmark star, title link and (outside compact mode)
/// creator details.
pub(crate) fn content_row(
    ui: &mut egui::Ui,
    item: &ContentItem,
    ctx: &DashboardContext<'_>,
    compact: bool,
    show_summary: bool,
) -> Option<WidgetAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        let bookmarked = ctx.bookmarks.contains(&item.id);
        let (star, hint) = if bookmarked {
            ("★", "Remove bookmark")
        } else {
            ("☆", "Bookmark")
        };
        if ui.small_button(star).on_hover_text(hint).clicked() {
            action = Some(WidgetAction::ToggleBookmark {
                item_id: item.id.clone(),
            });
        }
        if ui.link(&item.title).clicked() {
            action = Some(WidgetAction::OpenItem {
                item_id: item.id.clone(),
            });
        }
        if !compact {
            ui.weak(format!("{} · {}", item.creator_name, item.platform));
        }
    });
    if show_summary && !compact {
        ui.small(&item.summary);
    }
    action
}
