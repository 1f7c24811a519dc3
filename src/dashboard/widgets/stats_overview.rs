use super::{loading_label, DashboardContext, Widget, WidgetAction};
use eframe::egui;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsOverviewConfig {
    #[serde(default = "default_true")]
    pub show_bookmarks: bool,
    #[serde(default)]
    pub compact: bool,
}

impl Default for StatsOverviewConfig {
    fn default() -> Self {
        Self {
            show_bookmarks: default_true(),
            compact: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub label: &'static str,
    pub value: String,
}

pub struct StatsOverviewWidget {
    cfg: StatsOverviewConfig,
}

impl StatsOverviewWidget {
    pub fn new(cfg: StatsOverviewConfig) -> Self {
        Self { cfg }
    }

    pub fn stats(&self, ctx: &DashboardContext<'_>) -> Vec<StatLine> {
        let watched = ctx.content.watch_history.len();
        let finished = ctx
            .content
            .watch_history
            .iter()
            .filter(|e| e.is_finished())
            .count();
        let minutes = ctx.content.minutes_watched();
        let mut stats = vec![
            StatLine {
                label: "Watched",
                value: format!("{watched} ({finished} finished)"),
            },
            StatLine {
                label: "Watch time",
                value: format!("{}h {}m", minutes / 60, minutes % 60),
            },
            StatLine {
                label: "Following",
                value: format!("{} creators", ctx.content.followed_creators()),
            },
        ];
        if self.cfg.show_bookmarks {
            stats.push(StatLine {
                label: "Bookmarks",
                value: ctx.bookmarks.len().to_string(),
            });
        }
        stats
    }
}

impl Widget for StatsOverviewWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        if !ctx.content_loaded {
            loading_label(ui);
            return None;
        }
        let stats = self.stats(ctx);
        if self.cfg.compact {
            let line = stats
                .iter()
                .map(|s| format!("{}: {}", s.label, s.value))
                .collect::<Vec<_>>()
                .join(" · ");
            ui.small(line);
            return None;
        }
        egui::Grid::new(ui.id().with("stats-overview"))
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for stat in &stats {
                    ui.label(stat.label);
                    ui.strong(&stat.value);
                    ui.end_row();
                }
            });
        None
    }

    fn on_config_updated(&mut self, props: &serde_json::Value) {
        if let Ok(cfg) = serde_json::from_value::<StatsOverviewConfig>(props.clone()) {
            self.cfg = cfg;
        }
    }
}
