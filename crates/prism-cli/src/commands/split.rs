use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use prism_core::decompose::DecomposeMode;
use prism_core::io::{load_image, save_image};
use prism_core::task::{
    Decomposer, DecompositionResult, DecompositionTask, Dispatch, ExecutionPath, InteractionGate,
};

use super::{load_config, ModeArg};

#[derive(Args)]
pub struct SplitArgs {
    /// Input image file
    pub file: PathBuf,

    /// Channel decomposition to run
    #[arg(short, long, value_enum, default_value = "rgb")]
    pub mode: ModeArg,

    /// Viewer config (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pixel count above which the split runs on a worker thread
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Output file path
    #[arg(short, long, default_value = "split.png")]
    pub output: PathBuf,
}

pub fn run(args: &SplitArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(threshold) = args.threshold {
        config.decomposition.large_image_threshold = threshold;
    }

    let image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let mode = DecomposeMode::from(args.mode);
    crate::summary::print_split_summary(&args.file, &image, mode, &config.decomposition);

    if image.is_grayscale() {
        println!("Image is already grayscale, writing it unchanged");
    }

    let gate = InteractionGate::new();
    let mut decomposer = Decomposer::new(config.decomposition, gate.clone());
    let result = match decomposer.request(Arc::new(image), mode)? {
        Dispatch::Ready(result) => result,
        Dispatch::Scheduled(task) => wait_with_spinner(task, &gate)?,
    };

    let path = match result.path {
        ExecutionPath::Synchronous => "inline",
        ExecutionPath::Background => "worker thread",
    };
    println!(
        "Split {}x{} in {:.1}ms ({})",
        result.buffer.width(),
        result.buffer.height(),
        result.elapsed.as_secs_f64() * 1000.0,
        path
    );

    save_image(&result.buffer, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Saved to {}", args.output.display());
    Ok(())
}

/// Spin while the gate is held, then hand back the worker's result.
fn wait_with_spinner(
    mut task: DecompositionTask,
    gate: &InteractionGate,
) -> Result<DecompositionResult> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    pb.set_message(format!("Decomposing {} ({})", task.request(), task.mode()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut result = None;
    while gate.is_blocked() {
        if task.poll(|r| result = Some(r)) {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    pb.finish_and_clear();

    result.ok_or_else(|| anyhow!("Decomposition {} produced no result", task.request()))
}
