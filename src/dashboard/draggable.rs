use crate::dashboard::config::{WidgetConfig, WidgetSpan, WidgetType};
use crate::dashboard::layout::{effective_props, toggled_span};
use crate::dashboard::widgets::{
    render_placeholder, DashboardContext, Widget, WidgetAction, WidgetRegistry,
};
use eframe::egui;
use serde_json::Value;
use siphasher::sip::SipHasher24;
use std::hash::Hasher;

/// Drag-and-drop payload carried from a widget's handle to a drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub widget_id: String,
}

/// Result of dispatching a widget to its content renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    Placeholder(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeState {
    /// This widget is the one being dragged.
    pub being_dragged: bool,
    /// Some widget on the grid is being dragged.
    pub any_dragging: bool,
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeMode {
    /// Full chrome with handle and toggles.
    Interactive,
    /// Title and content only; used for the floating drag overlay.
    Overlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChromeResponse {
    pub toggle_enabled: Option<bool>,
    pub resize: Option<WidgetSpan>,
    /// The drag handle is held by the pointer this frame.
    pub handle_dragged: bool,
    pub handle_rect: Option<egui::Rect>,
    pub action: Option<WidgetAction>,
    pub outcome: RenderOutcome,
}

fn props_hash(widget_type: &WidgetType, props: &Value) -> u64 {
    let mut hasher = SipHasher24::new_with_keys(0, 0);
    hasher.write(widget_type.as_str().as_bytes());
    if let Ok(bytes) = serde_json::to_vec(props) {
        hasher.write(&bytes);
    }
    hasher.finish()
}

/// Renderer instance kept alive across frames for one widget id.
#[derive(Default)]
pub struct WidgetRuntime {
    widget_type: Option<WidgetType>,
    hash: u64,
    widget: Option<Box<dyn Widget>>,
}

impl WidgetRuntime {
    /// Make sure the instance matches `widget_type` and `props`, creating or
    /// re-configuring it as needed. Returns `None` for types without a renderer.
    fn sync(
        &mut self,
        widget_type: &WidgetType,
        props: &Value,
        registry: &WidgetRegistry,
    ) -> Option<&mut Box<dyn Widget>> {
        let hash = props_hash(widget_type, props);
        if self.widget_type.as_ref() != Some(widget_type) {
            self.widget = registry.create(widget_type, props);
            self.widget_type = Some(widget_type.clone());
            self.hash = hash;
        } else if self.hash != hash {
            if let Some(widget) = self.widget.as_mut() {
                widget.on_config_updated(props);
            }
            self.hash = hash;
        }
        self.widget.as_mut()
    }
}

/// Chrome around a single widget: header with title, resize toggle,
/// visibility toggle and drag handle, followed by the content renderer.
pub struct DraggableWidget<'a> {
    config: &'a WidgetConfig,
    state: ChromeState,
    mode: ChromeMode,
}

impl<'a> DraggableWidget<'a> {
    pub fn new(config: &'a WidgetConfig, state: ChromeState) -> Self {
        Self {
            config,
            state,
            mode: ChromeMode::Interactive,
        }
    }

    pub fn overlay(config: &'a WidgetConfig, compact: bool) -> Self {
        Self {
            config,
            state: ChromeState {
                being_dragged: false,
                any_dragging: true,
                compact,
            },
            mode: ChromeMode::Overlay,
        }
    }

    pub fn handle_id(widget_id: &str) -> egui::Id {
        egui::Id::new(("widget-drag-handle", widget_id))
    }

    pub fn show(
        self,
        ui: &mut egui::Ui,
        runtime: &mut WidgetRuntime,
        registry: &WidgetRegistry,
        ctx: &DashboardContext<'_>,
    ) -> ChromeResponse {
        let mut response = ChromeResponse {
            toggle_enabled: None,
            resize: None,
            handle_dragged: false,
            handle_rect: None,
            action: None,
            outcome: RenderOutcome::Rendered,
        };
        let cell = ui.max_rect();

        let mut frame = egui::Frame::group(ui.style());
        if self.state.any_dragging {
            frame = frame
                .stroke(ui.visuals().selection.stroke)
                .shadow(ui.visuals().popup_shadow);
        }
        let framed = frame.show(ui, |ui| {
            ui.set_min_size((cell.size() - egui::vec2(12.0, 12.0)).max(egui::Vec2::ZERO));
            let header_rect = ui
                .horizontal(|ui| {
                    let title = ui.strong(&self.config.title);
                    if self.mode == ChromeMode::Interactive {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            self.header_controls(ui, &mut response);
                        });
                    }
                    title.rect
                })
                .inner;
            ui.separator();

            let body_height = (cell.height()
                - header_rect.height()
                - 3.0 * ui.spacing().item_spacing.y
                - 16.0)
                .max(0.0);
            let props = effective_props(&self.config.props, self.state.compact);
            egui::ScrollArea::vertical()
                .id_source(("widget-scroll", self.mode == ChromeMode::Overlay, &self.config.id))
                .auto_shrink([false; 2])
                .max_height(body_height)
                .show(ui, |ui| match runtime.sync(&self.config.widget_type, &props, registry) {
                    Some(widget) => {
                        response.action = widget.render(ui, ctx);
                    }
                    None => {
                        let message = render_placeholder(ui, &self.config.widget_type);
                        response.outcome = RenderOutcome::Placeholder(message);
                    }
                });
        });

        if self.state.being_dragged {
            ui.painter().rect_filled(
                framed.response.rect.shrink(2.0),
                4.0,
                ui.visuals().extreme_bg_color.gamma_multiply(0.7),
            );
        }
        response
    }

    fn header_controls(&self, ui: &mut egui::Ui, response: &mut ChromeResponse) {
        let handle_id = Self::handle_id(&self.config.id);
        // Once the drag is under way the source only returns a hover response,
        // so ask the context rather than the response.
        response.handle_dragged = ui.ctx().is_being_dragged(handle_id);
        let handle = ui.dnd_drag_source(
            handle_id,
            DragPayload {
                widget_id: self.config.id.clone(),
            },
            |ui| {
                ui.add(egui::Label::new("☰").selectable(false));
            },
        );
        response.handle_rect = Some(handle.response.rect);
        handle.response.on_hover_text("Drag to reorder");

        if ui
            .small_button("👁")
            .on_hover_text(if self.config.enabled {
                "Hide widget"
            } else {
                "Show widget"
            })
            .clicked()
        {
            response.toggle_enabled = Some(!self.config.enabled);
        }

        let (icon, hint) = if self.config.span.is_expanded() {
            ("🗕", "Collapse")
        } else {
            ("🗖", "Expand")
        };
        if ui.small_button(icon).on_hover_text(hint).clicked() {
            response.resize = Some(toggled_span(self.config.span));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSnapshot;
    use crate::dashboard::config::WidgetKind;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn show(config: &WidgetConfig, runtime: &mut WidgetRuntime) -> Option<ChromeResponse> {
        let registry = WidgetRegistry::with_defaults();
        let content = ContentSnapshot::default();
        let bookmarks = BTreeSet::new();
        let ctx = DashboardContext {
            content: &content,
            bookmarks: &bookmarks,
            content_loaded: true,
        };
        let mut out = None;
        egui::__run_test_ui(|ui| {
            let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(300.0, 200.0));
            ui.allocate_ui_at_rect(rect, |ui| {
                out = Some(DraggableWidget::new(config, ChromeState::default()).show(
                    ui,
                    runtime,
                    &registry,
                    &ctx,
                ));
            });
        });
        out
    }

    #[test]
    fn unknown_type_renders_placeholder() {
        let config = WidgetConfig::new("mystery", "does-not-exist", 0);
        let mut runtime = WidgetRuntime::default();
        let response = show(&config, &mut runtime).unwrap();
        match response.outcome {
            RenderOutcome::Placeholder(message) => assert!(message.contains("does-not-exist")),
            RenderOutcome::Rendered => panic!("expected placeholder"),
        }
    }

    #[test]
    fn known_type_renders_content() {
        let config = WidgetConfig::new("stats", WidgetKind::StatsOverview, 0);
        let mut runtime = WidgetRuntime::default();
        let response = show(&config, &mut runtime).unwrap();
        assert_eq!(response.outcome, RenderOutcome::Rendered);
        assert!(response.toggle_enabled.is_none());
        assert!(response.resize.is_none());
        assert!(!response.handle_dragged);
        assert!(response.handle_rect.is_some());
    }

    #[test]
    fn runtime_recreates_on_type_change_and_updates_on_props_change() {
        let registry = WidgetRegistry::with_defaults();
        let feed = WidgetType::Known(WidgetKind::PersonalizedFeed);
        let mut runtime = WidgetRuntime::default();
        assert!(runtime.sync(&feed, &json!({ "limit": 2 }), &registry).is_some());
        let first = runtime.hash;
        assert!(runtime.sync(&feed, &json!({ "limit": 3 }), &registry).is_some());
        assert_ne!(first, runtime.hash);
        let unknown = WidgetType::from("nope");
        assert!(runtime.sync(&unknown, &json!({}), &registry).is_none());
        assert_eq!(runtime.widget_type, Some(unknown));
    }
}
