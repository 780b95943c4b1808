use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use prism_core::decompose::DecomposeMode;
use prism_core::geometry::{Point, Size};
use prism_core::io::{load_image, save_image};
use prism_core::task::{Decomposer, Dispatch, InteractionGate};
use prism_core::viewport::{Modifiers, PointerButton, RasterSurface, ViewportController};

use super::{load_config, ModeArg};

#[derive(Args)]
pub struct RenderArgs {
    /// Input image file
    pub file: PathBuf,

    /// Surface width in pixels
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Zoom-in steps (x2 each) applied after fitting
    #[arg(long, default_value = "0")]
    pub zoom_in: u32,

    /// Zoom-out steps (x0.5 each) applied after fitting
    #[arg(long, default_value = "0")]
    pub zoom_out: u32,

    /// Show the image at 1:1 instead of fitting it
    #[arg(long)]
    pub actual_size: bool,

    /// Bilinear resampling
    #[arg(long)]
    pub smooth: bool,

    /// Split the image before rendering
    #[arg(long, value_enum)]
    pub split: Option<ModeArg>,

    /// Measurement line in image pixels: x0,y0,x1,y1
    #[arg(long)]
    pub line: Option<String>,

    /// Save the whole surface instead of only the visible image area
    #[arg(long)]
    pub full_frame: bool,

    /// Viewer config (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let line = args.line.as_deref().map(parse_line).transpose()?;

    let mut image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    if let Some(mode) = args.split {
        let mode = DecomposeMode::from(mode);
        let mut decomposer = Decomposer::new(config.decomposition.clone(), InteractionGate::new());
        image = match decomposer.request(Arc::new(image), mode)? {
            Dispatch::Ready(result) => result.buffer,
            Dispatch::Scheduled(task) => {
                println!("Splitting on a worker thread...");
                task.wait()
                    .ok_or_else(|| anyhow!("Decomposition worker produced no result"))?
                    .buffer
            }
        };
    }

    let mut viewport = ViewportController::new(config.viewport.clone());
    if args.smooth {
        viewport.set_transformation_quality(true);
    }
    viewport.resize(Size::new(args.width as f64, args.height as f64));
    viewport.display(image, true);

    if args.actual_size {
        viewport.zoom_to_actual_size();
    }
    for _ in 0..args.zoom_in {
        viewport.zoom_in();
    }
    for _ in 0..args.zoom_out {
        viewport.zoom_out();
    }

    if let Some([x0, y0, x1, y1]) = line {
        drag_line(&mut viewport, (x0, y0), (x1, y1));
    }

    crate::summary::print_render_summary(&viewport);

    let frame = if args.full_frame {
        let mut surface = RasterSurface::new(args.width, args.height);
        viewport.render_to(&mut surface);
        surface.into_frame()
    } else {
        viewport.grab(None)
    };
    if frame.is_empty() {
        bail!("Nothing visible to render");
    }

    save_image(&frame, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!(
        "Saved {}x{} to {}",
        frame.width(),
        frame.height(),
        args.output.display()
    );
    Ok(())
}

/// Replay a Ctrl+drag between the centers of two image pixels.
fn drag_line(viewport: &mut ViewportController, from: (i32, i32), to: (i32, i32)) {
    let start = viewport.map_from_scene(Point::new(from.0 as f64 + 0.5, from.1 as f64 + 0.5));
    let end = viewport.map_from_scene(Point::new(to.0 as f64 + 0.5, to.1 as f64 + 0.5));
    viewport.pointer_press(start, PointerButton::Primary, Modifiers::CTRL);
    viewport.pointer_move(end);
    viewport.pointer_release(end, PointerButton::Primary);
}

fn parse_line(text: &str) -> Result<[i32; 4]> {
    let values = text
        .split(',')
        .map(|s| s.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Invalid line format, expected x0,y0,x1,y1")?;
    match values.as_slice() {
        &[x0, y0, x1, y1] => Ok([x0, y0, x1, y1]),
        _ => bail!("Line needs exactly four values, got {}", values.len()),
    }
}
