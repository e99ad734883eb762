//! RepoWarden CLI: declaratively manage GitHub repository governance.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod errors;

/// RepoWarden: reconcile team permissions, repository features, branch
/// protection and labels against a declarative configuration.
#[derive(Parser)]
#[command(name = "repo-warden")]
#[command(about = "Declaratively manage GitHub repository governance", long_about = None)]
struct Cli {
    /// Path to the governance configuration file.
    #[arg(short, long, global = true, default_value = "repositories.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply team permissions and repository feature settings
    Sync,

    /// Apply merge strategies and branch protection
    Branches,

    /// Reconcile repository labels against the configured default set
    Label,

    /// Import live configuration for one repository and print it as YAML
    Import {
        /// Repository in owner/repo form
        repository: String,
    },

    /// Export live configuration for a set of repositories as CSV
    Export {
        /// Repositories in owner/repo form
        repositories: Vec<String>,

        /// File with one owner/repo per line (# comments allowed)
        #[arg(long)]
        batch_file: Option<PathBuf>,

        /// Output CSV file
        #[arg(long, default_value = "repositories.csv")]
        output: PathBuf,

        /// Append to the output file instead of overwriting it
        #[arg(long)]
        append: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("REPO_WARDEN_LOG"))
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Sync => commands::sync(&cli.config).await,
        Commands::Branches => commands::branches(&cli.config).await,
        Commands::Label => commands::label(&cli.config).await,
        Commands::Import { repository } => commands::import(repository).await,
        Commands::Export {
            repositories,
            batch_file,
            output,
            append,
        } => commands::export(repositories, batch_file.as_deref(), output, *append).await,
    };

    if let Err(e) = result {
        error!("Error: {e}");
        std::process::exit(1);
    }
}
