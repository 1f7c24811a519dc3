mod feed_panel;

pub use feed_panel::FeedPanel;

use crate::content::{BookmarkStore, ContentLoader};
use crate::dashboard::{
    ConfiguratorEvent, ContentCache, DashboardContext, DashboardEvent, PersonalizedDashboard,
    WidgetAction,
};
use crate::settings::Settings;
use crate::storage::SharedStore;
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::time::Duration;

pub struct DashboardApp {
    dashboard: PersonalizedDashboard,
    feed: FeedPanel,
    bookmarks: BookmarkStore,
    cache: ContentCache,
    loader: Option<ContentLoader>,
    toasts: Toasts,
    pub enable_toasts: bool,
    pub toast_duration: f32,
}

impl DashboardApp {
    /// `storage` is `None` when no backend could be opened; `fallback` marks a
    /// storage file that could not be used and was replaced by memory.
    pub fn new(settings: &Settings, storage: Option<SharedStore>, fallback: bool) -> Self {
        let dashboard = PersonalizedDashboard::new(
            storage.clone(),
            settings.default_view_mode,
            settings.compact_by_default,
        );
        let bookmarks = BookmarkStore::load(storage);
        let loader = ContentLoader::spawn(
            settings.content_seed,
            Duration::from_millis(settings.content_latency_ms),
        );
        let mut app = Self {
            dashboard,
            feed: FeedPanel::default(),
            bookmarks,
            cache: ContentCache::new(),
            loader: Some(loader),
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
        };
        if fallback {
            app.toast(
                ToastKind::Warning,
                "Storage unavailable; changes will not be kept after closing.",
            );
        }
        let warnings = app.dashboard.store().warnings().to_vec();
        for warning in warnings {
            app.toast(ToastKind::Warning, warning);
        }
        app
    }

    pub fn dashboard(&self) -> &PersonalizedDashboard {
        &self.dashboard
    }

    fn toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        if !self.enable_toasts {
            return;
        }
        let text: String = text.into();
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
        });
    }

    fn poll_content(&mut self, ctx: &egui::Context) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        if let Some(snapshot) = loader.poll() {
            self.cache.replace(snapshot);
            self.loader = None;
        } else if loader.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            self.loader = None;
        }
    }

    fn handle_action(&mut self, action: WidgetAction) {
        match action {
            WidgetAction::OpenItem { item_id } => {
                let title = self
                    .cache
                    .snapshot()
                    .item(&item_id)
                    .map(|item| item.title.clone());
                self.feed.select(&item_id);
                if let Some(title) = title {
                    self.toast(ToastKind::Info, format!("Opening \"{title}\""));
                }
            }
            WidgetAction::ToggleBookmark { item_id } => {
                let text = if self.bookmarks.toggle(&item_id) {
                    "Bookmarked"
                } else {
                    "Bookmark removed"
                };
                self.toast(ToastKind::Success, text);
            }
        }
    }

    fn handle_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::LayoutChanged => {}
            DashboardEvent::Action(action) => self.handle_action(action),
            DashboardEvent::Configurator(ConfiguratorEvent::Saved) => {
                self.toast(ToastKind::Success, "Widget settings saved");
            }
            DashboardEvent::Configurator(ConfiguratorEvent::Reset) => {
                self.toast(ToastKind::Info, "Widgets reset to defaults");
            }
            DashboardEvent::Configurator(ConfiguratorEvent::Cancelled) => {}
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.enable_toasts {
            self.toasts.show(ctx);
        }
        self.poll_content(ctx);

        egui::TopBottomPanel::top("dashboard-toolbar").show(ctx, |ui| {
            self.dashboard.toolbar(ui);
        });

        let snapshot = self.cache.snapshot();
        let loaded = self.cache.is_loaded();
        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let dctx = DashboardContext {
                    content: &snapshot,
                    bookmarks: self.bookmarks.ids(),
                    content_loaded: loaded,
                };
                let feed = &mut self.feed;
                self.dashboard.ui(ui, &dctx, |ui| feed.ui(ui, &dctx))
            })
            .inner;

        for event in events {
            self.handle_event(event);
        }
    }
}
