mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prism", about = "Image viewer core: channel splits and headless rendering")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image dimensions and format
    Info(commands::info::InfoArgs),
    /// Split an image into its R,G,B or L*,a*,b* planes
    Split(commands::split::SplitArgs),
    /// Render an image through the viewport and save the result
    Render(commands::render::RenderArgs),
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Split(args) => commands::split::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
