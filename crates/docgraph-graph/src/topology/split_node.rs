//! Three nodes per document: a key-only primary node linked to a content
//! node and a metadata node.
//!
//! ```cypher
//! (a:`Doc` {id})-[:WITH_CONTENT]->(:`Doc_content` {source})
//! (a)-[:WITH_META]->(:`Doc_metadata` {source})
//! ```
//!
//! Both links are MERGEd, so repeating an upsert reuses the same satellites.

use docgraph_core::GraphWriteConfig;

use super::StoreInput;
use crate::cypher::{
    content_label, keyed_node, metadata_label, quote, PARAM_CONTENT, PARAM_METADATA,
    PARAM_SOURCE_ID, SATELLITE_KEY, WITH_CONTENT, WITH_META,
};
use crate::labels;
use crate::params::CypherStatement;

pub(crate) fn store(config: &GraphWriteConfig, input: StoreInput, content: String) -> CypherStatement {
    let label = &config.primary_label;
    let mut text = format!(
        "MERGE {}",
        keyed_node("a", label, &config.target_reference_field)
    );

    let extra_labels = labels::set_items("a", &input.labels);
    if !extra_labels.is_empty() {
        text.push_str(" SET ");
        text.push_str(&extra_labels);
    }

    text.push_str(&format!(
        " MERGE (a)-[:{rel}]->{node} SET content.{field} = ${param}",
        rel = WITH_CONTENT,
        node = keyed_node("content", &content_label(label), SATELLITE_KEY),
        field = quote(&config.target_content_field),
        param = PARAM_CONTENT,
    ));
    text.push_str(&format!(
        " MERGE (a)-[:{rel}]->{node} SET metadata += ${param}",
        rel = WITH_META,
        node = keyed_node("metadata", &metadata_label(label), SATELLITE_KEY),
        param = PARAM_METADATA,
    ));
    text.push_str(&input.relationships.text);

    let mut statement = CypherStatement::new(text)
        .param(PARAM_SOURCE_ID, input.source_id.as_str())
        .param(PARAM_METADATA, input.metadata_param(config))
        .param(PARAM_CONTENT, content);
    statement.params.extend(input.relationships.params);
    statement
}

/// Remove the primary node and whichever satellites hang off it.
///
/// Nothing matches when the document was never stored, which makes the
/// delete a no-op rather than an error.
pub(crate) fn delete(config: &GraphWriteConfig, source_id: String) -> CypherStatement {
    let label = &config.primary_label;
    CypherStatement::new(format!(
        "MATCH {} \
         OPTIONAL MATCH (a)-[:{}]->(content:{}) \
         OPTIONAL MATCH (a)-[:{}]->(metadata:{}) \
         DETACH DELETE a, content, metadata",
        keyed_node("a", label, &config.target_reference_field),
        WITH_CONTENT,
        quote(&content_label(label)),
        WITH_META,
        quote(&metadata_label(label)),
    ))
    .param(PARAM_SOURCE_ID, source_id)
}
