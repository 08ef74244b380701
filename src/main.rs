use std::sync::Arc;

use anyhow::Context;

use led_panel::api::HttpBackend;
use led_panel::config::{settings_path, Settings};
use led_panel::gui::PanelApp;
use led_panel::logging;

fn main() -> anyhow::Result<()> {
    let path = settings_path();
    let settings = Settings::load(&path)
        .with_context(|| format!("load settings from {path}"))?
        .with_env_overrides();
    logging::init(settings.debug_logging);

    let backend = HttpBackend::connect(settings.api_base())?;
    tracing::info!(url = backend.url(), "using backend");
    let backend = Arc::new(backend);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([380.0, 320.0])
            .with_title("LED strip"),
        ..Default::default()
    };

    eframe::run_native(
        "LED strip",
        options,
        Box::new(move |cc| Box::new(PanelApp::new(cc, backend, &settings))),
    )
    .map_err(|e| anyhow::anyhow!("ui: {e}"))
}
