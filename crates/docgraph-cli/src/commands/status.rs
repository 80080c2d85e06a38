//! Report what is stored under the configured labels.

use anyhow::Result;
use colored::Colorize;

use docgraph_core::TopologyKind;
use docgraph_graph::cypher::{content_label, metadata_label};
use docgraph_graph::{GraphSession, Neo4jSession};

use crate::output;
use crate::settings::Settings;

pub async fn execute(settings: Settings) -> Result<()> {
    let graph = &settings.graph;
    let session = Neo4jSession::open(&settings.connection).await?;

    output::print_header("Graph Status");
    println!("  {:<16} {}", "Server:", settings.connection.uri);
    println!("  {:<16} {}", "Database:", settings.connection.database);
    println!("  {:<16} {}", "Topology:", graph.topology.as_str().yellow());
    println!();

    let mut labels = vec![graph.primary_label.clone()];
    if graph.topology == TopologyKind::Split {
        labels.push(content_label(&graph.primary_label));
        labels.push(metadata_label(&graph.primary_label));
    }

    for label in &labels {
        match session.counts(label).await {
            Ok(counts) => output::print_counts(label, &counts),
            Err(e) => {
                session.close().await?;
                return Err(e.into());
            }
        }
        println!();
    }

    session.close().await?;
    Ok(())
}
