//! One node per document holding both metadata and content.
//!
//! ```cypher
//! MERGE (a:`Doc` {`id`: $source_id})
//! SET a += $source_metadata, a.`body` = $source_content, a:`Extra`
//! WITH a CALL { ... }
//! ```

use docgraph_core::GraphWriteConfig;

use super::StoreInput;
use crate::cypher::{keyed_node, quote, PARAM_CONTENT, PARAM_METADATA, PARAM_SOURCE_ID};
use crate::labels;
use crate::params::CypherStatement;

/// Upsert clauses for a single document node, with an optional content property.
pub(crate) fn node_statement(
    config: &GraphWriteConfig,
    input: StoreInput,
    content: Option<String>,
) -> CypherStatement {
    let mut set_items = vec![format!("a += ${}", PARAM_METADATA)];
    if content.is_some() {
        set_items.push(format!(
            "a.{} = ${}",
            quote(&config.target_content_field),
            PARAM_CONTENT
        ));
    }
    let labels = labels::set_items("a", &input.labels);
    if !labels.is_empty() {
        set_items.push(labels);
    }

    let text = format!(
        "MERGE {} SET {}{}",
        keyed_node("a", &config.primary_label, &config.target_reference_field),
        set_items.join(", "),
        input.relationships.text,
    );

    let mut statement = CypherStatement::new(text)
        .param(PARAM_SOURCE_ID, input.source_id.as_str())
        .param(PARAM_METADATA, input.metadata_param(config));
    if let Some(content) = content {
        statement = statement.param(PARAM_CONTENT, content);
    }
    statement.params.extend(input.relationships.params);
    statement
}

pub(crate) fn store(config: &GraphWriteConfig, input: StoreInput, content: String) -> CypherStatement {
    node_statement(config, input, Some(content))
}

/// Remove the node and all of its relationships. Matching nothing is a no-op.
pub(crate) fn delete(config: &GraphWriteConfig, source_id: String) -> CypherStatement {
    CypherStatement::new(format!(
        "MATCH {} DETACH DELETE a",
        keyed_node("a", &config.primary_label, &config.target_reference_field)
    ))
    .param(PARAM_SOURCE_ID, source_id)
}
