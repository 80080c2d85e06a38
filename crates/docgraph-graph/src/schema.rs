//! Neo4j schema initialization (key uniqueness constraints).
//!
//! A uniqueness constraint on the MERGE key keeps concurrent upserts of the
//! same document from creating duplicate nodes.

use docgraph_core::{GraphWriteConfig, TopologyKind};
use tracing::info;

use crate::cypher::{content_label, metadata_label, quote, SATELLITE_KEY};
use crate::error::GraphResult;
use crate::params::CypherStatement;
use crate::session::GraphSession;

fn constraint_name(label: &str, key: &str) -> String {
    let raw = format!("docgraph_{}_{}", label, key);
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

fn unique_constraint(label: &str, key: &str) -> String {
    format!(
        "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
        quote(&constraint_name(label, key)),
        quote(label),
        quote(key)
    )
}

/// Constraint statements for the configured topology.
///
/// The template topology owns its own Cypher, so nothing is generated for it.
pub fn constraint_statements(config: &GraphWriteConfig) -> Vec<String> {
    let label = &config.primary_label;
    match config.topology {
        TopologyKind::Template => Vec::new(),
        TopologyKind::SingleNode | TopologyKind::MetadataOnly => {
            vec![unique_constraint(label, &config.target_reference_field)]
        }
        TopologyKind::Split => vec![
            unique_constraint(label, &config.target_reference_field),
            unique_constraint(&content_label(label), SATELLITE_KEY),
            unique_constraint(&metadata_label(label), SATELLITE_KEY),
        ],
    }
}

/// Create the key constraints for the configured topology.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn ensure_constraints<S: GraphSession + ?Sized>(
    session: &S,
    config: &GraphWriteConfig,
) -> GraphResult<usize> {
    info!("Initializing Neo4j schema...");

    let statements = constraint_statements(config);
    for statement in &statements {
        session.execute(&CypherStatement::new(statement.as_str())).await?;
    }

    info!("Neo4j schema initialized ({} statements)", statements.len());
    Ok(statements.len())
}
