pub mod config;
pub mod info;
pub mod render;
pub mod split;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use prism_core::config::ViewerConfig;
use prism_core::decompose::DecomposeMode;

/// Decomposition selector shared by `split` and `render`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Rgb,
    Lab,
}

impl From<ModeArg> for DecomposeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Rgb => DecomposeMode::Rgb,
            ModeArg::Lab => DecomposeMode::Lab,
        }
    }
}

/// Read a TOML config, or fall back to defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ViewerConfig =
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?;
    config.validate()?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
