use super::{content_row, empty_label, loading_label, DashboardContext, Widget, WidgetAction};
use eframe::egui;
use serde::{Deserialize, Serialize};

fn default_limit() -> usize {
    6
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalizedFeedConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_true")]
    pub show_summary: bool,
    #[serde(default)]
    pub compact: bool,
}

impl Default for PersonalizedFeedConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            show_summary: default_true(),
            compact: false,
        }
    }
}

pub struct PersonalizedFeedWidget {
    cfg: PersonalizedFeedConfig,
}

impl PersonalizedFeedWidget {
    pub fn new(cfg: PersonalizedFeedConfig) -> Self {
        Self { cfg }
    }

    /// Compact mode halves the item count so the widget fits a smaller row.
    fn visible_count(&self) -> usize {
        let limit = self.cfg.limit.max(1);
        if self.cfg.compact {
            limit.div_ceil(2)
        } else {
            limit
        }
    }
}

impl Widget for PersonalizedFeedWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        if !ctx.content_loaded {
            loading_label(ui);
            return None;
        }
        if ctx.content.feed.is_empty() {
            empty_label(ui, "Follow some creators to fill your feed.");
            return None;
        }
        let mut action = None;
        for item in ctx.content.feed.iter().take(self.visible_count()) {
            if let Some(a) = content_row(ui, item, ctx, self.cfg.compact, self.cfg.show_summary) {
                action = Some(a);
            }
            if !self.cfg.compact {
                ui.add_space(2.0);
            }
        }
        action
    }

    fn on_config_updated(&mut self, props: &serde_json::Value) {
        if let Ok(cfg) = serde_json::from_value::<PersonalizedFeedConfig>(props.clone()) {
            self.cfg = cfg;
        }
    }
}
