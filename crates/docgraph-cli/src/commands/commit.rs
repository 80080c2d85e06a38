//! Commit a batch of operations.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use docgraph_graph::{schema, BatchDispatcher, Neo4jSession};

use crate::batch::read_batch;
use crate::output;
use crate::settings::Settings;

#[derive(Args)]
pub struct CommitArgs {
    /// Batch file of JSON operation records, `-` for stdin
    pub batch: PathBuf,

    /// Create key constraints before writing
    #[arg(long)]
    pub ensure_schema: bool,
}

pub async fn execute(args: CommitArgs, settings: Settings) -> Result<()> {
    let records = read_batch(&args.batch)?;
    if records.is_empty() {
        println!("{}", "Batch is empty, nothing to commit.".dimmed());
        return Ok(());
    }
    info!(records = records.len(), batch = %args.batch.display(), "Committing batch");

    let session = Neo4jSession::open(&settings.connection).await?;
    let dispatcher = BatchDispatcher::new(settings.graph, session)?;

    if args.ensure_schema {
        schema::ensure_constraints(dispatcher.session(), dispatcher.config()).await?;
    }

    let result = dispatcher.commit_records(records).await;
    dispatcher.close().await?;

    let summary = result?;
    output::print_summary(&summary);
    Ok(())
}
