use content_dashboard::gui::DashboardApp;
use content_dashboard::logging;
use content_dashboard::settings::{Settings, SETTINGS_FILE};
use content_dashboard::storage;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SETTINGS_FILE.to_string());
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging, settings.log_file());

    let storage_path = settings.storage_path();
    let (store, fallback) = storage::open_or_memory(&storage_path);
    tracing::info!(path = %storage_path.display(), fallback, "storage ready");

    let (width, height) = settings.window_size.unwrap_or((1200, 800));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([420.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Content Dashboard",
        native_options,
        Box::new(move |_cc| Box::new(DashboardApp::new(&settings, Some(store), fallback))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))
}
