mod app;
mod convert;
mod messages;
mod panels;
mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use prism_core::config::ViewerConfig;

/// Config file read at startup when present.
const CONFIG_ENV: &str = "PRISM_CONFIG";

fn load_config() -> Result<ViewerConfig> {
    let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) else {
        return Ok(ViewerConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ViewerConfig =
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = load_config().unwrap_or_else(|e| {
        tracing::warn!("{e:#}, using defaults");
        ViewerConfig::default()
    });
    let initial = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("Prism"),
        ..Default::default()
    };

    eframe::run_native(
        "PrismViewer",
        options,
        Box::new(move |cc| Ok(Box::new(app::PrismApp::new(&cc.egui_ctx, config, initial)))),
    )
}
