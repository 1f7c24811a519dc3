pub mod config;
pub mod configurator;
pub mod data_cache;
pub mod draggable;
pub mod grid;
pub mod layout;
pub mod personalized;
pub mod store;
pub mod widgets;

pub use config::{WidgetConfig, WidgetKind, WidgetSpan, WidgetType};
pub use configurator::{ConfiguratorEvent, WidgetConfigurator};
pub use data_cache::ContentCache;
pub use grid::{DashboardGrid, GridEvent};
pub use personalized::{DashboardEvent, PersonalizedDashboard, ViewMode};
pub use store::WidgetConfigStore;
pub use widgets::{DashboardContext, WidgetAction, WidgetRegistry};
