use crate::dashboard::config::WidgetConfig;
use crate::dashboard::configurator::{ConfiguratorEvent, WidgetConfigurator};
use crate::dashboard::grid::{DashboardGrid, GridEvent};
use crate::dashboard::layout::{set_enabled, set_span};
use crate::dashboard::store::WidgetConfigStore;
use crate::dashboard::widgets::{DashboardContext, WidgetAction, WidgetRegistry};
use crate::storage::SharedStore;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Widgets,
    Feed,
    #[default]
    Hybrid,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Widgets, ViewMode::Feed, ViewMode::Hybrid];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Widgets => "Widgets",
            ViewMode::Feed => "Feed",
            ViewMode::Hybrid => "Hybrid",
        }
    }

    pub fn shows_widgets(self) -> bool {
        matches!(self, ViewMode::Widgets | ViewMode::Hybrid)
    }

    pub fn shows_feed(self) -> bool {
        matches!(self, ViewMode::Feed | ViewMode::Hybrid)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// The canonical collection was changed from the grid.
    LayoutChanged,
    Configurator(ConfiguratorEvent),
    Action(WidgetAction),
}

/// Top-level dashboard: widget grid and/or feed depending on the view mode,
/// plus the density toggle and the configurator trigger.
///
/// View mode and density are session state only. Density is passed to the
/// grid and overlaid on each widget's props at render time.
pub struct PersonalizedDashboard {
    store: WidgetConfigStore,
    registry: WidgetRegistry,
    grid: DashboardGrid,
    configurator: WidgetConfigurator,
    pub view_mode: ViewMode,
    pub compact: bool,
}

impl PersonalizedDashboard {
    pub fn new(storage: Option<SharedStore>, view_mode: ViewMode, compact: bool) -> Self {
        Self::with_registry(storage, WidgetRegistry::with_defaults(), view_mode, compact)
    }

    pub fn with_registry(
        storage: Option<SharedStore>,
        registry: WidgetRegistry,
        view_mode: ViewMode,
        compact: bool,
    ) -> Self {
        let mut store = WidgetConfigStore::new(storage);
        store.load_widgets();
        Self {
            store,
            registry,
            grid: DashboardGrid::new(),
            configurator: WidgetConfigurator::default(),
            view_mode,
            compact,
        }
    }

    pub fn store(&self) -> &WidgetConfigStore {
        &self.store
    }

    pub fn widgets(&self) -> &[WidgetConfig] {
        self.store.widgets()
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn configurator(&self) -> &WidgetConfigurator {
        &self.configurator
    }

    pub fn open_configurator(&mut self) {
        self.configurator.open(&self.store);
    }

    /// Apply a grid event to the store. Widget actions are handed back to the
    /// caller untouched.
    pub fn apply(&mut self, event: GridEvent) -> Option<DashboardEvent> {
        match event {
            GridEvent::Reordered(widgets) => {
                self.store.save_widgets(widgets);
                Some(DashboardEvent::LayoutChanged)
            }
            GridEvent::Toggled { id, enabled } => {
                let next = set_enabled(self.store.widgets(), &id, enabled);
                self.store.save_widgets(next);
                Some(DashboardEvent::LayoutChanged)
            }
            GridEvent::Resized { id, span } => {
                let next = set_span(self.store.widgets(), &id, span);
                self.store.save_widgets(next);
                Some(DashboardEvent::LayoutChanged)
            }
            GridEvent::Action(action) => Some(DashboardEvent::Action(action)),
        }
    }

    /// View mode selector, density toggle and configurator button.
    pub fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for mode in ViewMode::ALL {
                ui.selectable_value(&mut self.view_mode, mode, mode.label());
            }
            ui.separator();
            ui.checkbox(&mut self.compact, "Compact");
            ui.separator();
            if ui.button("Customize widgets").clicked() {
                self.open_configurator();
            }
        });
    }

    /// Render the body for the current view mode. `feed` draws the
    /// traditional feed and may return an action of its own.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &DashboardContext<'_>,
        feed: impl FnOnce(&mut egui::Ui) -> Option<WidgetAction>,
    ) -> Vec<DashboardEvent> {
        let mut grid_events = Vec::new();
        let mut feed_action = None;
        match self.view_mode {
            ViewMode::Widgets => {
                grid_events = self.show_grid(ui, ctx);
            }
            ViewMode::Feed => {
                feed_action = feed(ui);
            }
            ViewMode::Hybrid => {
                ui.columns(2, |cols| {
                    egui::ScrollArea::vertical()
                        .id_source("dashboard-widgets")
                        .show(&mut cols[0], |ui| {
                            grid_events = self.show_grid(ui, ctx);
                        });
                    feed_action = feed(&mut cols[1]);
                });
            }
        }

        let mut events: Vec<DashboardEvent> = grid_events
            .into_iter()
            .filter_map(|e| self.apply(e))
            .collect();
        if let Some(action) = feed_action {
            events.push(DashboardEvent::Action(action));
        }
        if let Some(event) = self
            .configurator
            .ui(ui.ctx(), &mut self.store, &self.registry)
        {
            events.push(DashboardEvent::Configurator(event));
        }
        events
    }

    fn show_grid(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) -> Vec<GridEvent> {
        if self.store.widgets().iter().all(|w| !w.enabled) {
            ui.weak("All widgets are hidden. Use \"Customize widgets\" to bring some back.");
        }
        self.grid
            .ui(ui, self.store.widgets(), &self.registry, ctx, self.compact)
    }
}
