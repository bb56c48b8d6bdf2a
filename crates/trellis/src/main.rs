//! Trellis CLI - static site pipeline.
//!
//! Provides commands for:
//! - `build`: Render every page and stylesheet of a site
//! - `nav`: Print the breadcrumbs or table of contents for one page
//! - `section`: Print an anchored section heading and its slug

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, NavArgs, SectionArgs};
use output::Output;

/// Trellis - static site pipeline.
#[derive(Parser)]
#[command(name = "trellis", version, about)]
struct Cli {
    /// Enable verbose output (per-page timing and converter logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site.
    Build(BuildArgs),
    /// Render navigation for a page.
    Nav(NavArgs),
    /// Render a section heading.
    Section(SectionArgs),
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
        Commands::Build(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
        Commands::Section(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
