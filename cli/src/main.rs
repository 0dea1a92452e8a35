mod commands;
mod utils;

use berth_shim::DockerShim;
use clap::{Parser, Subcommand};
use commands::{apply, list_containers, plan, validate_file};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "berth")]
#[command(about = "Berth - converge containers to their declared state")]
struct Cli {
    /// Container engine CLI to invoke
    #[arg(long, global = true, default_value = "docker")]
    docker: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Converge containers to the records in FILE
    Apply {
        /// JSON file with desired container records
        file: PathBuf,

        /// Only show what would change
        #[arg(long)]
        dry_run: bool,
    },
    /// Show what apply would do without changing anything
    Plan {
        /// JSON file with desired container records
        file: PathBuf,
    },
    /// Check records without contacting the engine
    Validate {
        /// JSON file with desired container records
        file: PathBuf,
    },
    /// List containers as the engine reports them
    #[command(visible_alias = "ps")]
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let shim = DockerShim::new(cli.docker);
    tracing::debug!("Using engine binary {}", shim.binary().display());

    match cli.command {
        Commands::Apply { file, dry_run } => {
            if dry_run {
                plan(shim, &file).await?;
            } else {
                apply(shim, &file).await?;
            }
        }
        Commands::Plan { file } => {
            plan(shim, &file).await?;
        }
        Commands::Validate { file } => {
            validate_file(&file)?;
        }
        Commands::List => {
            list_containers(shim).await?;
        }
    }

    Ok(())
}
