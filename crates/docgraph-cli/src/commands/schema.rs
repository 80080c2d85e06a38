//! Create key constraints.

use anyhow::Result;
use colored::Colorize;

use docgraph_graph::{schema, GraphSession, Neo4jSession};

use crate::settings::Settings;

pub async fn execute(settings: Settings) -> Result<()> {
    settings.graph.validate()?;

    let statements = schema::constraint_statements(&settings.graph);
    if statements.is_empty() {
        println!(
            "{}",
            "The template topology manages its own schema; nothing to create.".dimmed()
        );
        return Ok(());
    }

    let session = Neo4jSession::open(&settings.connection).await?;
    let result = schema::ensure_constraints(&session, &settings.graph).await;
    session.close().await?;
    let created = result?;

    println!("{}", "Schema ready:".green().bold());
    for statement in &statements {
        println!("  {}", statement.dimmed());
    }
    println!("  {} constraint(s) ensured", created);
    Ok(())
}
