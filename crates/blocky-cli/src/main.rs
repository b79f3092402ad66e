//! Blocky engine driver.
//!
//! Provides the `blocky` binary for exercising the block-linking engine
//! without a renderer. `replay` builds the canvas described by a JSON scenario,
//! runs its pointer steps through the drag controller and prints the resulting
//! outline (or the full report as JSON). `kinds` prints the compatibility
//! table.
//!
//! Reads configuration from environment variables:
//! - `BLOCKY_ATTRACT_DISTANCE`: snap radius (default: 30)
//! - `RUST_LOG`: tracing filter (default: "warn")

mod error;
mod outline;
mod scenario;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use blocky_core::{set_attraction_distance, BlockKind, EngineConfig, Port};

use crate::error::CliError;
use crate::scenario::Scenario;

/// Block-linking engine tools.
#[derive(Parser)]
#[command(name = "blocky", about = "Block-linking engine tools")]
struct Cli {
    /// Snap radius; overrides the scenario and `BLOCKY_ATTRACT_DISTANCE`.
    #[arg(long, global = true)]
    attract_distance: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Replay a drag scenario and print the resulting outline.
    Replay {
        /// Path to the scenario JSON file.
        scenario: PathBuf,

        /// Print dispatches, events and roots as JSON instead of the outline.
        #[arg(long)]
        json: bool,
    },
    /// Print which kinds each kind accepts on each port.
    Kinds,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Replay { scenario, json } => {
            match run_replay(&scenario, json, cli.attract_distance) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    e.exit_code()
                }
            }
        }
        Commands::Kinds => {
            print_kinds();
            0
        }
    };
    process::exit(exit_code);
}

/// Execute the replay subcommand.
///
/// The snap radius comes from the flag, else the scenario, else the
/// environment, else the default.
fn run_replay(path: &Path, json: bool, flag: Option<f64>) -> Result<(), CliError> {
    EngineConfig::from_env()?.apply()?;

    let scenario = Scenario::load(path)?;
    if let Some(distance) = flag.or(scenario.attract_distance) {
        set_attraction_distance(distance)?;
    }

    let mut graph = scenario.build()?;
    graph.take_events();
    let report = scenario.run(&mut graph)?;
    tracing::info!(
        steps = scenario.steps.len(),
        roots = report.roots.len(),
        "replay finished"
    );

    if json {
        let out = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
        });
        println!("{}", out);
    } else {
        print!("{}", outline::render(&graph));
    }
    Ok(())
}

fn print_kinds() {
    for kind in BlockKind::ALL {
        let ports: Vec<String> = Port::ALL
            .into_iter()
            .filter(|port| !kind.accepts(*port).is_empty())
            .map(|port| {
                let names: Vec<&str> = kind.accepts(port).iter().map(|k| k.name()).collect();
                format!("{}: {}", port, names.join(", "))
            })
            .collect();
        if ports.is_empty() {
            println!("{}", kind);
        } else {
            println!("{}  {}", kind, ports.join("; "));
        }
    }
}
