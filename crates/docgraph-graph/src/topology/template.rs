//! Statements taken verbatim from configuration.
//!
//! The document's metadata fields become top-level parameters. The key and
//! the content are added under the configured parameter names, and every
//! optional parameter the document lacks is bound to null because Neo4j
//! rejects statements that reference unbound parameters.

use docgraph_core::{GraphWriteConfig, Metadata, TemplateConfig};

use crate::cypher::PARAM_SOURCE_ID;
use crate::params::{flatten_metadata, CypherStatement, ParamValue};

fn statement(
    text: &str,
    template: &TemplateConfig,
    config: &GraphWriteConfig,
    source_id: String,
    metadata: &Metadata,
) -> CypherStatement {
    let mut params = flatten_metadata(metadata, &config.multi_values_joiner);
    for name in &template.optional_parameters {
        params.entry(name.clone()).or_insert(ParamValue::Null);
    }
    params
        .entry(PARAM_SOURCE_ID.to_string())
        .or_insert(ParamValue::String(source_id));
    CypherStatement {
        text: text.to_string(),
        params,
    }
}

pub(crate) fn store(
    template: &TemplateConfig,
    config: &GraphWriteConfig,
    source_id: String,
    mut metadata: Metadata,
    content: String,
) -> CypherStatement {
    if !template.node_id_property.is_empty() {
        metadata.set(template.node_id_property.as_str(), source_id.as_str());
    }
    if !template.node_content_property.is_empty() {
        metadata.set(template.node_content_property.as_str(), content);
    }
    statement(&template.upsert_cypher, template, config, source_id, &metadata)
}

pub(crate) fn delete(
    template: &TemplateConfig,
    config: &GraphWriteConfig,
    source_id: String,
    mut metadata: Metadata,
) -> CypherStatement {
    if !template.node_id_property.is_empty() {
        metadata.set(template.node_id_property.as_str(), source_id.as_str());
    }
    statement(&template.delete_cypher, template, config, source_id, &metadata)
}

#[cfg(test)]
mod tests {
    use docgraph_core::{ContentStream, DocumentOperation, TopologyKind};

    use super::*;
    use crate::topology::Topology;

    fn config() -> GraphWriteConfig {
        GraphWriteConfig {
            topology: TopologyKind::Template,
            template: Some(TemplateConfig {
                upsert_cypher: "MERGE (p:Page {url: $id}) SET p.title = $title, p.body = $body, p.lang = $lang".to_string(),
                delete_cypher: "MATCH (p:Page {url: $id}) DETACH DELETE p".to_string(),
                optional_parameters: vec!["title".to_string(), "lang".to_string()],
                node_id_property: "id".to_string(),
                node_content_property: "body".to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_template_upsert_params() {
        let config = config();
        let topology = Topology::from_config(&config).unwrap();
        let meta = Metadata::new().with("title", ["Home"]).with("tags", ["a", "b"]);
        let op = DocumentOperation::upsert("http://x/", meta, Some(ContentStream::from_text("hi")));
        let statement = topology.build(op, &config).unwrap();

        assert!(statement.text.starts_with("MERGE (p:Page {url: $id})"));
        assert_eq!(statement.get("id"), Some(&ParamValue::from("http://x/")));
        assert_eq!(statement.get("body"), Some(&ParamValue::from("hi")));
        assert_eq!(statement.get("title"), Some(&ParamValue::from("Home")));
        assert_eq!(statement.get("tags"), Some(&ParamValue::from("a|b")));
        assert_eq!(statement.get("lang"), Some(&ParamValue::Null));
        assert_eq!(statement.get("source_id"), Some(&ParamValue::from("http://x/")));
    }

    #[test]
    fn test_template_delete_params() {
        let config = config();
        let topology = Topology::from_config(&config).unwrap();
        let op = DocumentOperation::delete("http://x/", Metadata::new());
        let statement = topology.build(op, &config).unwrap();

        assert_eq!(statement.text, "MATCH (p:Page {url: $id}) DETACH DELETE p");
        assert_eq!(statement.get("id"), Some(&ParamValue::from("http://x/")));
        assert_eq!(statement.get("title"), Some(&ParamValue::Null));
        assert!(statement.get("body").is_none());
    }

    #[test]
    fn test_template_id_uses_resolved_key() {
        let config = config();
        let topology = Topology::from_config(&config).unwrap();
        let meta = Metadata::new().with("document.reference", ["http://x/canonical"]);

        let upsert = topology
            .build(DocumentOperation::upsert("http://x/?s=1", meta.clone(), None), &config)
            .unwrap();
        assert_eq!(upsert.get("id"), Some(&ParamValue::from("http://x/canonical")));

        let delete = topology
            .build(DocumentOperation::delete("http://x/?s=1", meta), &config)
            .unwrap();
        assert_eq!(delete.get("id"), Some(&ParamValue::from("http://x/canonical")));
    }

    #[test]
    fn test_template_empty_joiner_keeps_lists() {
        let mut config = config();
        config.multi_values_joiner = String::new();
        let topology = Topology::from_config(&config).unwrap();
        let meta = Metadata::new().with("tags", ["a", "b"]);
        let statement = topology
            .build(DocumentOperation::upsert("x", meta, None), &config)
            .unwrap();
        assert_eq!(
            statement.get("tags"),
            Some(&ParamValue::List(vec!["a".to_string(), "b".to_string()]))
        );
    }
}
