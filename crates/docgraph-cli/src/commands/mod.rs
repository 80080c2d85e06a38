//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::Settings;

pub mod commit;
pub mod preview;
pub mod schema;
pub mod status;

/// docgraph - commit document batches to a Neo4j graph
#[derive(Parser)]
#[command(name = "docgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ./docgraph.toml when present)
    #[arg(short, long, global = true, env = "DOCGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Neo4j password, overriding the settings file
    #[arg(long, global = true, env = "DOCGRAPH_NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commit a batch file (JSON lines, `-` for stdin)
    Commit(commit::CommitArgs),

    /// Print the statements a batch would run, without connecting
    Preview(preview::PreviewArgs),

    /// Create key uniqueness constraints for the configured topology
    Schema,

    /// Show node and relationship counts for the primary label
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut settings = Settings::discover(self.config.as_deref())?;
        if let Some(password) = self.password {
            settings.connection.password = password;
        }

        match self.command {
            Commands::Commit(args) => commit::execute(args, settings).await,
            Commands::Preview(args) => preview::execute(args, settings),
            Commands::Schema => schema::execute(settings).await,
            Commands::Status => status::execute(settings).await,
        }
    }
}
