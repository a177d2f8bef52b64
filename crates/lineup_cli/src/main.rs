//! Lineup CLI
//!
//! Lists formation suggestions, replays scripted lineup sessions and prints
//! the JSON schema of the persisted placement record.

mod script;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lineup_core::placement::PlacementRecordShape;
use lineup_core::{FormationCatalog, LineupConfig};
use tracing_subscriber::EnvFilter;

use crate::script::{load_steps, ScriptRunner};

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Formation and player placement tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List formation templates for a squad size
    Suggest {
        /// Number of selected players
        #[arg(long)]
        size: usize,
    },

    /// Replay a JSON script of lineup steps and print the final placements
    Run {
        /// Script file path
        #[arg(long)]
        script: PathBuf,

        /// Config file path (falls back to LINEUP_CONFIG_PATH, then defaults)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the JSON schema of a persisted placement record
    Schema,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest { size } => {
            let templates = FormationCatalog::global().suggestions(size);
            if templates.is_empty() {
                println!("No formations for a squad of {}", size);
            }
            for template in templates {
                let slots: Vec<&str> = template.slots().iter().map(|slot| slot.role.short_name()).collect();
                println!("{:<10} {}", template.name(), slots.join(" "));
            }
        }

        Commands::Run { script, config } => {
            let config = match config {
                Some(path) => LineupConfig::load(&path)?,
                None => LineupConfig::from_env()?,
            };
            let steps = load_steps(&script)?;
            tracing::info!(steps = steps.len(), script = %script.display(), "running script");

            let report = ScriptRunner::new(&config).run(&steps)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Schema => {
            let schema = schemars::schema_for!(PlacementRecordShape);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}
