use crate::content::{format_views, ContentItem, ContentSnapshot, Platform};
use crate::dashboard::widgets::{content_row, DashboardContext, WidgetAction};
use eframe::egui;
use std::collections::BTreeSet;

/// The traditional chronological feed shown next to, or instead of, the
/// widget grid.
#[derive(Debug, Default, Clone)]
pub struct FeedPanel {
    pub platform: Option<Platform>,
    pub bookmarked_only: bool,
    selected: Option<String>,
}

impl FeedPanel {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, item_id: &str) {
        self.selected = Some(item_id.to_string());
    }

    pub fn visible_items<'a>(
        &self,
        content: &'a ContentSnapshot,
        bookmarks: &BTreeSet<String>,
    ) -> Vec<&'a ContentItem> {
        content
            .feed
            .iter()
            .filter(|item| self.platform.map_or(true, |p| item.platform == p))
            .filter(|item| !self.bookmarked_only || bookmarks.contains(&item.id))
            .collect()
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Option<WidgetAction> {
        ui.heading("Latest from creators you follow");
        ui.horizontal(|ui| {
            let selected_text = self.platform.map_or("All platforms", |p| p.label());
            egui::ComboBox::from_id_source("feed-platform")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.platform, None, "All platforms");
                    for platform in Platform::ALL {
                        ui.selectable_value(&mut self.platform, Some(platform), platform.label());
                    }
                });
            ui.checkbox(&mut self.bookmarked_only, "Bookmarked only");
        });
        ui.separator();

        if !ctx.content_loaded {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Loading feed…");
            });
            return None;
        }
        let items = self.visible_items(ctx.content, ctx.bookmarks);
        if items.is_empty() {
            ui.weak("No items match the current filters.");
            return None;
        }

        let mut action = None;
        egui::ScrollArea::vertical()
            .id_source("feed-panel")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for item in items {
                    let selected = self.selected.as_deref() == Some(item.id.as_str());
                    let mut frame = egui::Frame::group(ui.style());
                    if selected {
                        frame = frame
                            .stroke(ui.visuals().selection.stroke)
                            .fill(ui.visuals().faint_bg_color);
                    }
                    frame.show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        if let Some(a) = content_row(ui, item, ctx, false, true) {
                            action = Some(a);
                        }
                        ui.weak(format!(
                            "{} · {} min · {} views",
                            item.published_at.format("%b %e"),
                            item.duration_minutes,
                            format_views(item.views)
                        ));
                    });
                }
            });
        if let Some(WidgetAction::OpenItem { item_id }) = &action {
            self.select(item_id);
        }
        action
    }
}
