use super::{empty_label, loading_label, DashboardContext, Widget, WidgetAction};
use eframe::egui;
use serde::{Deserialize, Serialize};

fn default_limit() -> usize {
    4
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContinueWatchingConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_true")]
    pub show_progress: bool,
    #[serde(default)]
    pub compact: bool,
}

impl Default for ContinueWatchingConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            show_progress: default_true(),
            compact: false,
        }
    }
}

pub struct ContinueWatchingWidget {
    cfg: ContinueWatchingConfig,
}

impl ContinueWatchingWidget {
    pub fn new(cfg: ContinueWatchingConfig) -> Self {
        Self { cfg }
    }
}

impl Widget for ContinueWatchingWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        if !ctx.content_loaded {
            loading_label(ui);
            return None;
        }
        let entries = ctx.content.in_progress();
        if entries.is_empty() {
            empty_label(ui, "Nothing in progress. Start something from your feed.");
            return None;
        }
        let mut action = None;
        for (entry, item) in entries.into_iter().take(self.cfg.limit.max(1)) {
            if ui.link(&item.title).clicked() {
                action = Some(WidgetAction::OpenItem {
                    item_id: item.id.clone(),
                });
            }
            if self.cfg.show_progress {
                let remaining =
                    (item.duration_minutes as f32 * (1.0 - entry.progress)).round() as u32;
                let bar = egui::ProgressBar::new(entry.progress);
                if self.cfg.compact {
                    ui.add(bar);
                } else {
                    ui.add(bar.text(format!("{remaining} min left")));
                }
            }
            if !self.cfg.compact {
                ui.weak(format!(
                    "{} · watched {}",
                    item.creator_name,
                    entry.last_watched.format("%b %e, %H:%M")
                ));
                ui.add_space(4.0);
            }
        }
        action
    }

    fn on_config_updated(&mut self, props: &serde_json::Value) {
        if let Ok(cfg) = serde_json::from_value::<ContinueWatchingConfig>(props.clone()) {
            self.cfg = cfg;
        }
    }
}
