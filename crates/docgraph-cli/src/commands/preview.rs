//! Show the statements a batch would run.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use docgraph_core::DocumentOperation;
use docgraph_graph::Topology;

use crate::batch::read_batch;
use crate::output;
use crate::settings::Settings;

#[derive(Args)]
pub struct PreviewArgs {
    /// Batch file of JSON operation records, `-` for stdin
    pub batch: PathBuf,

    /// Print one JSON object per operation instead of formatted text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: PreviewArgs, settings: Settings) -> Result<()> {
    let config = settings.graph;
    let topology = Topology::from_config(&config)?;
    let records = read_batch(&args.batch)?;

    if !args.json {
        output::print_header(&format!("Preview ({} topology)", topology.name()));
    }

    for record in records {
        let operation = DocumentOperation::try_from(record)?;
        let reference = operation.reference().to_string();
        let kind = operation.kind();
        let statement = topology.build(operation, &config)?;

        if args.json {
            let line = serde_json::json!({
                "reference": reference,
                "op": kind,
                "statement": statement,
            });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            output::print_statement(&reference, kind, &statement);
        }
    }

    if !args.json {
        println!("{}", "Nothing was written.".dimmed());
    }
    Ok(())
}
