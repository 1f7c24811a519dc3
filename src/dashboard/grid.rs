use crate::dashboard::config::{WidgetConfig, WidgetSpan};
use crate::dashboard::draggable::{ChromeState, DragPayload, DraggableWidget, WidgetRuntime};
use crate::dashboard::layout::{column_count, enabled_sorted, place_widgets, reorder_widgets};
use crate::dashboard::widgets::{DashboardContext, WidgetAction, WidgetRegistry};
use eframe::egui;
use std::collections::HashMap;

pub const GRID_GAP: f32 = 8.0;
pub const ROW_HEIGHT: f32 = 210.0;
pub const COMPACT_ROW_HEIGHT: f32 = 150.0;

/// Changes requested by user interaction with the grid. The grid never
/// mutates the collection it was given; the owner applies these.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Full collection with renumbered positions after a drag.
    Reordered(Vec<WidgetConfig>),
    Toggled { id: String, enabled: bool },
    Resized { id: String, span: WidgetSpan },
    Action(WidgetAction),
}

/// Screen geometry of one rendered widget, refreshed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub cell: egui::Rect,
    pub handle: Option<egui::Rect>,
}

/// Responsive grid of the enabled widgets with drag-to-reorder.
pub struct DashboardGrid {
    ready: bool,
    active: Option<String>,
    runtimes: HashMap<String, WidgetRuntime>,
    overlay_runtime: WidgetRuntime,
    cells: HashMap<String, CellGeometry>,
}

impl Default for DashboardGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardGrid {
    pub fn new() -> Self {
        Self {
            ready: false,
            active: None,
            runtimes: HashMap::new(),
            overlay_runtime: WidgetRuntime::default(),
            cells: HashMap::new(),
        }
    }

    /// `false` until the first frame has passed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Id of the widget currently being dragged.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Where the widget was laid out on the last rendered frame.
    pub fn cell(&self, id: &str) -> Option<CellGeometry> {
        self.cells.get(id).copied()
    }

    pub fn drag_start(&mut self, id: &str) {
        tracing::debug!(widget = id, "drag started");
        self.active = Some(id.to_string());
    }

    /// Finish the current drag. Returns the reordered collection, or `None`
    /// when the drop changes nothing.
    pub fn drag_end(
        &mut self,
        widgets: &[WidgetConfig],
        over: Option<&str>,
    ) -> Option<Vec<WidgetConfig>> {
        let active = self.active.take()?;
        let next = reorder_widgets(widgets, &active, over);
        match &next {
            Some(_) => tracing::debug!(widget = %active, over = ?over, "widget moved"),
            None => tracing::debug!(widget = %active, over = ?over, "drag ended without change"),
        }
        next
    }

    pub fn cancel_drag(&mut self) {
        self.active = None;
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        widgets: &[WidgetConfig],
        registry: &WidgetRegistry,
        ctx: &DashboardContext<'_>,
        compact: bool,
    ) -> Vec<GridEvent> {
        let mut events = Vec::new();
        if !self.ready {
            // Skip the first frame so the layout is computed against the
            // settled window size.
            self.ready = true;
            ui.ctx().request_repaint();
            return events;
        }

        let enabled = enabled_sorted(widgets);
        self.runtimes
            .retain(|id, _| enabled.iter().any(|w| &w.id == id));
        if self
            .active
            .as_ref()
            .is_some_and(|active| !enabled.iter().any(|w| &w.id == active))
        {
            self.active = None;
        }

        let width = ui.available_width().max(1.0);
        let cols = column_count(width);
        let spans: Vec<WidgetSpan> = enabled.iter().map(|w| w.span).collect();
        let (placements, rows) = place_widgets(&spans, cols);
        let row_height = if compact {
            COMPACT_ROW_HEIGHT
        } else {
            ROW_HEIGHT
        };
        let col_width = (width - GRID_GAP * (cols as f32 - 1.0)) / cols as f32;
        let height = if rows == 0 {
            0.0
        } else {
            rows as f32 * row_height + GRID_GAP * (rows as f32 - 1.0)
        };

        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let mut child = ui.child_ui(rect, egui::Layout::top_down(egui::Align::LEFT));
        let mut dropped: Option<(String, String)> = None;
        let pointer_down = ui.input(|i| i.pointer.any_down());
        self.cells.clear();

        for (cfg, placement) in enabled.iter().zip(placements) {
            let min = rect.min
                + egui::vec2(
                    placement.col as f32 * (col_width + GRID_GAP),
                    placement.row as f32 * (row_height + GRID_GAP),
                );
            let size = egui::vec2(
                placement.col_span as f32 * col_width
                    + (placement.col_span as f32 - 1.0) * GRID_GAP,
                placement.row_span as f32 * row_height
                    + (placement.row_span as f32 - 1.0) * GRID_GAP,
            );
            let cell = egui::Rect::from_min_size(min, size);
            let state = ChromeState {
                being_dragged: self.active.as_deref() == Some(cfg.id.as_str()),
                any_dragging: self.active.is_some(),
                compact,
            };
            let runtime = self.runtimes.entry(cfg.id.clone()).or_default();
            // Scope by widget id so every cell is its own drop target.
            let inner = child
                .push_id(&cfg.id, |ui| {
                    ui.allocate_ui_at_rect(cell, |ui| {
                        ui.set_clip_rect(cell.intersect(ui.clip_rect()));
                        DraggableWidget::new(cfg, state).show(ui, runtime, registry, ctx)
                    })
                })
                .inner;
            let chrome = inner.inner;
            self.cells.insert(
                cfg.id.clone(),
                CellGeometry {
                    cell,
                    handle: chrome.handle_rect,
                },
            );

            if chrome.handle_dragged && pointer_down && !state.being_dragged {
                self.drag_start(&cfg.id);
            }
            if let Some(enabled) = chrome.toggle_enabled {
                events.push(GridEvent::Toggled {
                    id: cfg.id.clone(),
                    enabled,
                });
            }
            if let Some(span) = chrome.resize {
                events.push(GridEvent::Resized {
                    id: cfg.id.clone(),
                    span,
                });
            }
            if let Some(action) = chrome.action {
                events.push(GridEvent::Action(action));
            }
            if let Some(payload) = inner.response.dnd_release_payload::<DragPayload>() {
                dropped = Some((payload.widget_id.clone(), cfg.id.clone()));
            }
        }

        let released = ui.input(|i| i.pointer.any_released());
        if let Some((source, over)) = dropped {
            if self.active.is_none() {
                self.active = Some(source);
            }
            if let Some(next) = self.drag_end(widgets, Some(&over)) {
                events.push(GridEvent::Reordered(next));
            }
        } else if self.active.is_some() && (released || !pointer_down) {
            // Dropped outside every widget.
            let _ = self.drag_end(widgets, None);
        }

        self.paint_overlay(ui, widgets, registry, ctx, compact);
        events
    }

    fn paint_overlay(
        &mut self,
        ui: &mut egui::Ui,
        widgets: &[WidgetConfig],
        registry: &WidgetRegistry,
        ctx: &DashboardContext<'_>,
        compact: bool,
    ) {
        let Some(active) = &self.active else {
            return;
        };
        let Some(cfg) = widgets.iter().find(|w| &w.id == active) else {
            return;
        };
        let Some(pointer) = ui.ctx().pointer_interact_pos() else {
            return;
        };
        let size = self
            .cells
            .get(active)
            .map_or(egui::vec2(320.0, ROW_HEIGHT), |geometry| geometry.cell.size());
        let size = egui::vec2(size.x.min(360.0), size.y.min(ROW_HEIGHT));
        let overlay_runtime = &mut self.overlay_runtime;
        egui::Area::new(egui::Id::new("widget-drag-overlay"))
            .order(egui::Order::Tooltip)
            .interactable(false)
            .fixed_pos(pointer - egui::vec2(size.x - 24.0, 12.0))
            .show(ui.ctx(), |ui| {
                ui.allocate_ui(size, |ui| {
                    DraggableWidget::overlay(cfg, compact).show(ui, overlay_runtime, registry, ctx);
                });
            });
        ui.ctx().request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSnapshot;
    use crate::dashboard::config::{default_widgets, WidgetKind};
    use std::collections::BTreeSet;

    fn abc() -> Vec<WidgetConfig> {
        vec![
            WidgetConfig::new("A", WidgetKind::StatsOverview, 0),
            WidgetConfig::new("B", WidgetKind::StatsOverview, 1),
            WidgetConfig::new("C", WidgetKind::StatsOverview, 2),
        ]
    }

    fn run_grid(grid: &mut DashboardGrid, widgets: &[WidgetConfig]) -> Vec<GridEvent> {
        let registry = WidgetRegistry::with_defaults();
        let content = ContentSnapshot::default();
        let bookmarks = BTreeSet::new();
        let ctx = DashboardContext {
            content: &content,
            bookmarks: &bookmarks,
            content_loaded: false,
        };
        let mut events = Vec::new();
        egui::__run_test_ui(|ui| {
            let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1000.0, 800.0));
            ui.allocate_ui_at_rect(rect, |ui| {
                events = grid.ui(ui, widgets, &registry, &ctx, false);
            });
        });
        events
    }

    /// Drives the grid through full egui frames with synthetic pointer input.
    struct PointerHarness {
        ctx: egui::Context,
        grid: DashboardGrid,
        widgets: Vec<WidgetConfig>,
        registry: WidgetRegistry,
        content: ContentSnapshot,
        bookmarks: BTreeSet<String>,
        time: f64,
    }

    impl PointerHarness {
        fn new(widgets: Vec<WidgetConfig>) -> Self {
            let mut harness = Self {
                ctx: egui::Context::default(),
                grid: DashboardGrid::new(),
                widgets,
                registry: WidgetRegistry::with_defaults(),
                content: ContentSnapshot::default(),
                bookmarks: BTreeSet::new(),
                time: 0.0,
            };
            // Readiness frame, then one frame to lay out the cells.
            harness.frame(vec![]);
            harness.frame(vec![]);
            harness
        }

        fn frame(&mut self, events: Vec<egui::Event>) -> Vec<GridEvent> {
            self.time += 1.0 / 60.0;
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(1000.0, 800.0),
                )),
                time: Some(self.time),
                events,
                ..Default::default()
            };
            let dctx = DashboardContext {
                content: &self.content,
                bookmarks: &self.bookmarks,
                content_loaded: false,
            };
            let grid = &mut self.grid;
            let widgets = &self.widgets;
            let registry = &self.registry;
            let mut out = Vec::new();
            let _ = self.ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    out = grid.ui(ui, widgets, registry, &dctx, false);
                });
            });
            out
        }

        fn handle(&self, id: &str) -> egui::Pos2 {
            self.grid.cell(id).unwrap().handle.unwrap().center()
        }

        fn center(&self, id: &str) -> egui::Pos2 {
            self.grid.cell(id).unwrap().cell.center()
        }

        fn move_to(&mut self, pos: egui::Pos2) -> Vec<GridEvent> {
            self.frame(vec![egui::Event::PointerMoved(pos)])
        }

        fn button(&mut self, pos: egui::Pos2, pressed: bool) -> Vec<GridEvent> {
            self.frame(vec![egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::NONE,
            }])
        }

        /// Press on `from`'s handle and carry the pointer to `to`, stepping
        /// through a few frames. The button is still held afterwards.
        fn drag(&mut self, from: &str, to: egui::Pos2) -> Vec<GridEvent> {
            let start = self.handle(from);
            let mut events = self.move_to(start);
            events.extend(self.button(start, true));
            for step in 1..=4 {
                let t = step as f32 / 4.0;
                events.extend(self.move_to(start + (to - start) * t));
            }
            events.extend(self.move_to(to));
            events
        }
    }

    #[test]
    fn cells_have_distinct_geometry() {
        let harness = PointerHarness::new(abc());
        let a = harness.grid.cell("A").unwrap();
        let b = harness.grid.cell("B").unwrap();
        let c = harness.grid.cell("C").unwrap();
        assert!(a.cell.max.x <= b.cell.min.x && b.cell.max.x <= c.cell.min.x);
        assert!(a.cell.contains(harness.handle("A")));
        assert!(!a.cell.contains(harness.center("C")));
    }

    #[test]
    fn pointer_drag_marks_widget_active() {
        let mut harness = PointerHarness::new(abc());
        let target = harness.center("B");
        assert!(harness.drag("A", target).is_empty());
        assert_eq!(harness.grid.active_id(), Some("A"));
        // Still held on the next frame.
        harness.move_to(target);
        assert_eq!(harness.grid.active_id(), Some("A"));
    }

    #[test]
    fn pointer_drop_on_other_widget_reorders() {
        let mut harness = PointerHarness::new(abc());
        let target = harness.center("C");
        let mut events = harness.drag("A", target);
        assert_eq!(harness.grid.active_id(), Some("A"));
        events.extend(harness.button(target, false));
        events.extend(harness.frame(vec![]));

        let reordered: Vec<&Vec<WidgetConfig>> = events
            .iter()
            .filter_map(|e| match e {
                GridEvent::Reordered(next) => Some(next),
                _ => None,
            })
            .collect();
        assert_eq!(reordered.len(), 1);
        let positions: Vec<(&str, u32)> = reordered[0]
            .iter()
            .map(|w| (w.id.as_str(), w.position))
            .collect();
        assert_eq!(positions, vec![("A", 2), ("B", 0), ("C", 1)]);
        assert!(harness.grid.active_id().is_none());
    }

    #[test]
    fn pointer_drop_outside_cells_changes_nothing() {
        let mut harness = PointerHarness::new(abc());
        let outside = egui::pos2(500.0, 700.0);
        assert!(!harness.grid.cell("A").unwrap().cell.contains(outside));
        let mut events = harness.drag("A", outside);
        assert_eq!(harness.grid.active_id(), Some("A"));
        events.extend(harness.button(outside, false));
        events.extend(harness.frame(vec![]));
        assert!(events.is_empty());
        assert!(harness.grid.active_id().is_none());
    }

    #[test]
    fn drop_on_itself_is_noop() {
        let widgets = abc();
        let mut grid = DashboardGrid::new();
        grid.drag_start("B");
        assert!(grid.drag_end(&widgets, Some("B")).is_none());
        assert!(grid.active_id().is_none());
    }

    #[test]
    fn drop_outside_is_noop() {
        let widgets = abc();
        let mut grid = DashboardGrid::new();
        grid.drag_start("A");
        assert!(grid.drag_end(&widgets, None).is_none());
        assert!(grid.active_id().is_none());
    }

    #[test]
    fn drag_end_without_start_is_noop() {
        let mut grid = DashboardGrid::new();
        assert!(grid.drag_end(&abc(), Some("C")).is_none());
    }

    #[test]
    fn drop_on_other_reorders() {
        let widgets = abc();
        let mut grid = DashboardGrid::new();
        grid.drag_start("A");
        let next = grid.drag_end(&widgets, Some("C")).unwrap();
        let positions: Vec<u32> = next.iter().map(|w| w.position).collect();
        assert_eq!(positions, vec![2, 0, 1]);
        assert_eq!(widgets, abc());
    }

    #[test]
    fn first_frame_renders_nothing() {
        let mut grid = DashboardGrid::new();
        assert!(!grid.is_ready());
        let events = run_grid(&mut grid, &default_widgets());
        assert!(events.is_empty());
        assert!(grid.is_ready());
        assert!(grid.runtimes.is_empty());
    }

    #[test]
    fn renders_only_enabled_widgets() {
        let mut widgets = default_widgets();
        widgets[1].enabled = false;
        let mut grid = DashboardGrid::new();
        run_grid(&mut grid, &widgets);
        let events = run_grid(&mut grid, &widgets);
        assert!(events.is_empty());
        assert_eq!(grid.runtimes.len(), 3);
        assert!(!grid.runtimes.contains_key(&widgets[1].id));
    }

    #[test]
    fn empty_grid_is_not_an_error() {
        let widgets: Vec<WidgetConfig> = default_widgets()
            .into_iter()
            .map(|w| w.with_enabled(false))
            .collect();
        let mut grid = DashboardGrid::new();
        run_grid(&mut grid, &widgets);
        assert!(run_grid(&mut grid, &widgets).is_empty());
        assert!(grid.runtimes.is_empty());
    }
}
