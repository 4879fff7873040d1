mod locations;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::locations::LocationsCommands;

#[derive(Debug, Parser)]
#[command(name = "pawmap-cli")]
#[command(about = "Browse and filter dog-friendly locations")]
struct Cli {
    /// Locations YAML file (defaults to the configured locations path)
    #[arg(long, global = true, env = "PAWMAP_LOCATIONS_PATH")]
    locations: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect the candidate location list
    Locations {
        #[command(subcommand)]
        command: LocationsCommands,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(Commands::Locations { command }) = cli.command else {
        println!("pawmap-cli: run `pawmap-cli locations --help` to get started");
        return Ok(());
    };

    let path = resolve_locations_path(cli.locations)?;
    locations::run(&path, command)
}

/// Explicit `--locations` wins; otherwise fall back to the app config default.
fn resolve_locations_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let config = pawmap_core::load_app_config()?;
    tracing::debug!(path = %config.locations_path.display(), "using configured locations path");
    Ok(config.locations_path)
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars).collect::<String>())
    } else {
        value.to_string()
    }
}
