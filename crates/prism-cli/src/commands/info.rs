use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use prism_core::decompose::SplitLayout;
use prism_core::io::load_image;

use super::load_config;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Viewer config (TOML) used for the large-image threshold
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let (w, h) = (image.width(), image.height());
    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", w, h);
    println!("Format:      {}", image.format());
    println!("Pixels:      {}", image.pixel_count());

    if image.is_grayscale() {
        println!("Split:       none (grayscale)");
    } else {
        let layout = SplitLayout::for_size(w, h);
        let (sw, sh) = layout.output_size(w, h);
        println!("Split:       {:?}, {}x{}", layout, sw, sh);
    }

    let large = config.decomposition.is_large(image.pixel_count());
    println!(
        "Large:       {} (threshold {} pixels)",
        if large { "yes" } else { "no" },
        config.decomposition.large_image_threshold
    );

    Ok(())
}
