use super::{content_row, empty_label, loading_label, DashboardContext, Widget, WidgetAction};
use crate::content::{format_views, ContentItem, ContentSnapshot, Platform};
use eframe::egui;
use serde::{Deserialize, Serialize};

fn default_limit() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingHighlightConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Restrict to a single platform.
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub compact: bool,
}

impl Default for TrendingHighlightConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            platform: None,
            compact: false,
        }
    }
}

pub struct TrendingHighlightWidget {
    cfg: TrendingHighlightConfig,
}

impl TrendingHighlightWidget {
    pub fn new(cfg: TrendingHighlightConfig) -> Self {
        Self { cfg }
    }

    fn items<'a>(&self, content: &'a ContentSnapshot) -> Vec<&'a ContentItem> {
        content
            .trending
            .iter()
            .filter(|item| self.cfg.platform.map_or(true, |p| item.platform == p))
            .take(self.cfg.limit.max(1))
            .collect()
    }
}

impl Widget for TrendingHighlightWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        if !ctx.content_loaded {
            loading_label(ui);
            return None;
        }
        let items = self.items(ctx.content);
        if items.is_empty() {
            empty_label(ui, "Nothing trending right now.");
            return None;
        }
        let mut action = None;
        for (rank, item) in items.into_iter().enumerate() {
            ui.horizontal(|ui| {
                ui.strong(format!("#{}", rank + 1));
                ui.vertical(|ui| {
                    if let Some(a) = content_row(ui, item, ctx, self.cfg.compact, false) {
                        action = Some(a);
                    }
                    if !self.cfg.compact {
                        ui.weak(format!("{} views", format_views(item.views)));
                    }
                });
            });
        }
        action
    }

    fn on_config_updated(&mut self, props: &serde_json::Value) {
        if let Ok(cfg) = serde_json::from_value::<TrendingHighlightConfig>(props.clone()) {
            self.cfg = cfg;
        }
    }
}
