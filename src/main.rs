//! Planogram - headless tools for cooler planogram layouts
//!
//! Exports placements as backend bounding-box JSON, validates them against
//! row rules, and lists valid drop targets for an item.

use clap::{Parser, Subcommand};
use planogram::cli::{ConfigArgs, ExportArgs, TargetsArgs, ValidateArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Planogram - headless tools for cooler planogram layouts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a placement as backend bounding-box JSON
    Export(ExportArgs),
    /// Check a placement for rule conflicts and overfull rows
    Validate(ValidateArgs),
    /// Show valid drop targets for an item
    Targets(TargetsArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Command::Export(args) => args.execute(),
        Command::Validate(args) => args.execute(),
        Command::Targets(args) => args.execute(),
        Command::Config(args) => args.execute(),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
