use crate::dashboard::config::WidgetConfig;
use crate::dashboard::layout::set_enabled;
use crate::dashboard::store::WidgetConfigStore;
use crate::dashboard::widgets::WidgetRegistry;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfiguratorEvent {
    Saved,
    Cancelled,
    /// Defaults were committed; the parent should refresh anything derived
    /// from the previous collection.
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
struct Session {
    /// Canonical collection the staged copy is compared against.
    baseline: Vec<WidgetConfig>,
    staged: Vec<WidgetConfig>,
    baseline_revision: u64,
}

/// Modal editor for widget enablement. Edits are staged locally and only
/// reach the store on save; reset commits immediately.
#[derive(Debug, Clone)]
pub struct WidgetConfigurator {
    session: Option<Session>,
    pub close_on_save: bool,
}

impl Default for WidgetConfigurator {
    fn default() -> Self {
        Self {
            session: None,
            close_on_save: true,
        }
    }
}

impl WidgetConfigurator {
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn open(&mut self, store: &WidgetConfigStore) {
        self.session = Some(Session {
            baseline: store.widgets().to_vec(),
            staged: store.widgets().to_vec(),
            baseline_revision: store.revision(),
        });
    }

    pub fn staged(&self) -> Option<&[WidgetConfig]> {
        self.session.as_ref().map(|s| s.staged.as_slice())
    }

    /// Changes pending relative to the canonical collection.
    pub fn is_dirty(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.baseline != s.staged)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) {
        if let Some(session) = self.session.as_mut() {
            session.staged = set_enabled(&session.staged, id, enabled);
        }
    }

    /// Flip a widget in the staged copy. Returns the new enabled state.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let current = self
            .staged()?
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.enabled)?;
        self.set_enabled(id, !current);
        Some(!current)
    }

    /// Pick up changes made to the store while the modal is open.
    pub fn sync(&mut self, store: &WidgetConfigStore) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.baseline_revision == store.revision() {
            return;
        }
        tracing::debug!(
            from = session.baseline_revision,
            to = store.revision(),
            "widget config changed while configurator open"
        );
        session.baseline = store.widgets().to_vec();
        session.staged = store.widgets().to_vec();
        session.baseline_revision = store.revision();
    }

    /// Commit the staged copy. The modal stays open.
    pub fn save(&mut self, store: &mut WidgetConfigStore) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        store.save_widgets(session.staged.clone());
        session.baseline = store.widgets().to_vec();
        session.baseline_revision = store.revision();
        true
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Commit the default set regardless of staged state and close.
    pub fn reset(&mut self, store: &mut WidgetConfigStore) -> ConfiguratorEvent {
        store.reset_widgets();
        self.session = None;
        ConfiguratorEvent::Reset
    }

    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        store: &mut WidgetConfigStore,
        registry: &WidgetRegistry,
    ) -> Option<ConfiguratorEvent> {
        self.sync(store);
        let staged = self.staged()?.to_vec();
        let dirty = self.is_dirty();

        let mut open = true;
        let mut toggled: Option<(String, bool)> = None;
        let mut clicked: Option<ConfiguratorEvent> = None;
        egui::Window::new("Customize widgets")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Choose which widgets appear on your dashboard.");
                ui.separator();
                let mut ordered: Vec<&WidgetConfig> = staged.iter().collect();
                ordered.sort_by_key(|w| w.position);
                for widget in ordered {
                    let mut enabled = widget.enabled;
                    ui.horizontal(|ui| {
                        if ui.checkbox(&mut enabled, &widget.title).changed() {
                            toggled = Some((widget.id.clone(), enabled));
                        }
                        match registry.description(&widget.widget_type) {
                            Some(desc) => {
                                ui.weak(desc);
                            }
                            None => {
                                ui.colored_label(
                                    egui::Color32::YELLOW,
                                    format!("unknown type \"{}\"", widget.widget_type),
                                );
                            }
                        }
                    });
                }
                ui.separator();
                if dirty {
                    ui.colored_label(egui::Color32::YELLOW, "Unsaved changes");
                }
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(dirty, egui::Button::new("Save"))
                        .clicked()
                    {
                        clicked = Some(ConfiguratorEvent::Saved);
                    }
                    if ui.button("Cancel").clicked() {
                        clicked = Some(ConfiguratorEvent::Cancelled);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Reset to defaults").clicked() {
                            clicked = Some(ConfiguratorEvent::Reset);
                        }
                    });
                });
            });

        if let Some((id, enabled)) = toggled {
            self.set_enabled(&id, enabled);
        }
        match clicked {
            Some(ConfiguratorEvent::Saved) => {
                self.save(store);
                if self.close_on_save {
                    self.session = None;
                }
                Some(ConfiguratorEvent::Saved)
            }
            Some(ConfiguratorEvent::Reset) => Some(self.reset(store)),
            Some(ConfiguratorEvent::Cancelled) => {
                self.cancel();
                Some(ConfiguratorEvent::Cancelled)
            }
            None if !open => {
                self.cancel();
                Some(ConfiguratorEvent::Cancelled)
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::config::default_widgets;
    use crate::storage::MemoryStore;

    fn loaded_store() -> WidgetConfigStore {
        let mut store = WidgetConfigStore::new(Some(MemoryStore::shared()));
        store.load_widgets();
        store
    }

    #[test]
    fn toggle_only_touches_staged_copy() {
        let store = loaded_store();
        let mut cfg = WidgetConfigurator::default();
        cfg.open(&store);
        assert!(!cfg.is_dirty());
        assert_eq!(cfg.toggle("stats-overview"), Some(false));
        assert!(cfg.is_dirty());
        assert!(store.widgets().iter().all(|w| w.enabled));
        assert_eq!(cfg.toggle("stats-overview"), Some(true));
        assert!(!cfg.is_dirty());
    }

    #[test]
    fn cancel_discards_staged_changes() {
        let store = loaded_store();
        let before = store.widgets().to_vec();
        let mut cfg = WidgetConfigurator::default();
        cfg.open(&store);
        cfg.toggle("continue-watching");
        cfg.cancel();
        assert!(!cfg.is_open());
        assert_eq!(store.widgets(), before.as_slice());
    }

    #[test]
    fn save_commits_and_stays_open() {
        let mut store = loaded_store();
        let mut cfg = WidgetConfigurator::default();
        cfg.open(&store);
        cfg.toggle("trending-highlight");
        assert!(cfg.save(&mut store));
        assert!(cfg.is_open());
        assert!(!cfg.is_dirty());
        let trending = store
            .widgets()
            .iter()
            .find(|w| w.id == "trending-highlight")
            .unwrap();
        assert!(!trending.enabled);
    }

    #[test]
    fn reset_ignores_staged_changes() {
        let mut store = loaded_store();
        store.save_widgets(set_enabled(store.widgets(), "personalized-feed", false));
        let mut cfg = WidgetConfigurator::default();
        cfg.open(&store);
        cfg.toggle("stats-overview");
        assert_eq!(cfg.reset(&mut store), ConfiguratorEvent::Reset);
        assert!(!cfg.is_open());
        assert_eq!(store.widgets(), default_widgets().as_slice());
    }

    #[test]
    fn external_change_resyncs_staged_copy() {
        let mut store = loaded_store();
        let mut cfg = WidgetConfigurator::default();
        cfg.open(&store);
        cfg.toggle("stats-overview");
        store.save_widgets(set_enabled(store.widgets(), "continue-watching", false));
        cfg.sync(&store);
        assert!(!cfg.is_dirty());
        assert_eq!(cfg.staged().unwrap(), store.widgets());
    }

    #[test]
    fn closed_configurator_ignores_edits() {
        let mut store = loaded_store();
        let mut cfg = WidgetConfigurator::default();
        assert!(cfg.toggle("stats-overview").is_none());
        assert!(!cfg.save(&mut store));
        assert!(!cfg.is_dirty());
    }

    #[test]
    fn window_renders_while_open() {
        let mut store = loaded_store();
        let registry = WidgetRegistry::with_defaults();
        let mut cfg = WidgetConfigurator::default();
        cfg.open(&store);
        let ctx = egui::Context::default();
        let mut event = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            event = cfg.ui(ctx, &mut store, &registry);
        });
        assert!(event.is_none());
        assert!(cfg.is_open());
    }
}
