//! Veil CLI - gated content renderer.
//!
//! Provides commands for:
//! - `render`: Render a page to HTML with gated blocks substituted
//! - `scan`: List the gated blocks of a page
//! - `unlock`: Try a credential against one gated block

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, ScanArgs, UnlockArgs};
use output::Output;

/// Veil - gated content renderer.
#[derive(Parser)]
#[command(name = "veil", version, about)]
struct Cli {
    /// Enable verbose output (INFO level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page to HTML.
    Render(RenderArgs),
    /// List gated blocks of a page.
    Scan(ScanArgs),
    /// Try a credential against a gated block.
    Unlock(UnlockArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Scan(args) => args.execute(&output),
        Commands::Unlock(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
