//! Node topologies: how one document is laid out in the graph.
//!
//! Each topology turns an upsert or delete into a single [`CypherStatement`].
//! Building is a pure function of the configuration and the operation, so the
//! same [`Topology`] can be shared by concurrent callers.

pub mod metadata_only;
pub mod single_node;
pub mod split_node;
pub mod template;

use docgraph_core::{
    ConfigError, ContentStream, DocumentOperation, GraphWriteConfig, Metadata, TemplateConfig,
    TopologyKind,
};
use tracing::{debug, warn};

use crate::error::GraphResult;
use crate::labels::{resolve_labels, LabelResolution};
use crate::params::{flatten_metadata, CypherStatement, ParamValue};
use crate::relationship::{self, RelationshipFragments};

/// The closed set of supported topologies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// One node carrying metadata and content.
    SingleNode,
    /// One node carrying metadata only.
    MetadataOnly,
    /// Key node with `WITH_CONTENT` and `WITH_META` satellites.
    Split,
    /// Configured Cypher for upsert and delete.
    Template(TemplateConfig),
}

impl Topology {
    /// Select the topology named by a validated configuration.
    pub fn from_config(config: &GraphWriteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(match config.topology {
            TopologyKind::SingleNode => Self::SingleNode,
            TopologyKind::MetadataOnly => Self::MetadataOnly,
            TopologyKind::Split => Self::Split,
            TopologyKind::Template => {
                let template = config
                    .template
                    .clone()
                    .ok_or(ConfigError::MissingTemplate("a [graph.template] table"))?;
                Self::Template(template)
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SingleNode => "single_node",
            Self::MetadataOnly => "metadata_only",
            Self::Split => "split",
            Self::Template(_) => "template",
        }
    }

    /// Build the statement for one operation.
    ///
    /// Fails only when the content stream cannot be read.
    pub fn build(
        &self,
        operation: DocumentOperation,
        config: &GraphWriteConfig,
    ) -> GraphResult<CypherStatement> {
        let statement = match operation {
            DocumentOperation::Upsert {
                reference,
                metadata,
                content,
            } => {
                let source_id = source_id(config, &reference, &metadata);
                self.build_store(config, source_id, metadata, content)?
            }
            DocumentOperation::Delete {
                reference,
                metadata,
            } => {
                let source_id = source_id(config, &reference, &metadata);
                self.build_delete(config, source_id, metadata)
            }
        };
        debug!(topology = self.name(), query = %statement.text, "Built statement");
        Ok(statement)
    }

    fn build_store(
        &self,
        config: &GraphWriteConfig,
        source_id: String,
        metadata: Metadata,
        content: Option<ContentStream>,
    ) -> GraphResult<CypherStatement> {
        Ok(match self {
            Self::SingleNode => {
                let content = read_content(config, content, &metadata)?;
                single_node::store(config, StoreInput::prepare(config, source_id, &metadata), content)
            }
            Self::MetadataOnly => {
                metadata_only::store(config, StoreInput::prepare(config, source_id, &metadata))
            }
            Self::Split => {
                let content = read_content(config, content, &metadata)?;
                split_node::store(config, StoreInput::prepare(config, source_id, &metadata), content)
            }
            Self::Template(template) => {
                let content = read_content(config, content, &metadata)?;
                template::store(template, config, source_id, metadata, content)
            }
        })
    }

    fn build_delete(
        &self,
        config: &GraphWriteConfig,
        source_id: String,
        metadata: Metadata,
    ) -> CypherStatement {
        match self {
            Self::SingleNode => single_node::delete(config, source_id),
            Self::MetadataOnly => metadata_only::delete(config, source_id),
            Self::Split => split_node::delete(config, source_id),
            Self::Template(template) => template::delete(template, config, source_id, metadata),
        }
    }
}

/// Key of the document: the configured source field when it holds a
/// non-blank value, the operation reference otherwise.
pub fn source_id(config: &GraphWriteConfig, reference: &str, metadata: &Metadata) -> String {
    let id = if config.source_reference_field.is_empty() {
        reference
    } else {
        metadata
            .first(&config.source_reference_field)
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(reference)
    };
    if id.trim().is_empty() {
        warn!(field = %config.source_reference_field, "Document has no key; writing under a blank id");
    }
    id.to_string()
}

/// Content from the stream, or from the configured source content field
/// when the operation has no stream.
fn read_content(
    config: &GraphWriteConfig,
    content: Option<ContentStream>,
    metadata: &Metadata,
) -> std::io::Result<String> {
    match content {
        Some(stream) => stream.read_to_string(),
        None if !config.source_content_field.is_empty() => Ok(metadata
            .get(&config.source_content_field)
            .map(|values| values.join(&config.multi_values_joiner))
            .unwrap_or_default()),
        None => Ok(String::new()),
    }
}

/// Per-document values shared by the label-aware topologies.
#[derive(Debug)]
pub(crate) struct StoreInput {
    pub source_id: String,
    pub labels: Vec<String>,
    pub metadata: Metadata,
    pub relationships: RelationshipFragments,
}

impl StoreInput {
    /// Apply label rules, then resolve relationships against what is left.
    ///
    /// The target reference field is never part of the stored metadata: the
    /// key is owned by the MERGE pattern.
    fn prepare(config: &GraphWriteConfig, source_id: String, metadata: &Metadata) -> Self {
        let LabelResolution { labels, metadata } =
            resolve_labels(&config.additional_labels, metadata);
        let relationships =
            relationship::resolve(&config.relationships, &config.primary_label, &metadata, &source_id);
        let metadata = metadata.without(&config.target_reference_field);
        Self {
            source_id,
            labels,
            metadata,
            relationships,
        }
    }

    pub fn metadata_param(&self, config: &GraphWriteConfig) -> ParamValue {
        ParamValue::Map(flatten_metadata(&self.metadata, &config.multi_values_joiner))
    }
}
