//! starsync — keep a Notion database in step with your GitHub stars.
//!
//! # Usage
//!
//! ```text
//! starsync sync [--config <path>] [--delete] [--dry-run] [--cache | --cache-file <path>]
//! starsync stars [--config <path>] [--json] [--cache | --cache-file <path>]
//! starsync config show [--config <path>]
//! starsync config path
//! starsync config init [--force]
//! ```
//!
//! Global flags: `-v` / `-vv` raise log verbosity (stderr), `--log-json`
//! switches log output to JSON. `RUST_LOG` overrides both.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{config::ConfigCommand, stars::StarsArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "starsync",
    version,
    about = "Sync your GitHub stars into a Notion database",
    long_about = None,
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch stars and reconcile the Notion table with them.
    Sync(SyncArgs),

    /// Fetch and list stars without touching the table.
    Stars(StarsArgs),

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Stars(args) => args.run(),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn init_tracing(verbose: u8, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
