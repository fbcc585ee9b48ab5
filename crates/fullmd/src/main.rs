//! fullmd CLI - markdown tag resolver.
//!
//! Provides commands for:
//! - `render`: Convert one value (inline markdown or a file path)
//! - `resolve`: Convert every `!markdown` value in a YAML document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, ResolveArgs};
use output::Output;

/// fullmd - markdown tag resolver.
#[derive(Parser)]
#[command(name = "fullmd", version, about)]
struct Cli {
    /// Enable verbose output (pipeline builds and file lookups).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single value to HTML and plain text.
    Render(RenderArgs),
    /// Convert every tagged value in a YAML document.
    Resolve(ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async {
        match cli.command {
            Commands::Render(args) => args.execute(cli.verbose).await,
            Commands::Resolve(args) => args.execute(cli.verbose).await,
        }
    });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
