//! Graph write configuration.
//!
//! Built once at startup (usually from the `[graph]` table of the settings
//! file) and read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default label of committed document nodes.
pub const DEFAULT_PRIMARY_LABEL: &str = "CommittedDocument";
/// Default node property holding the document key.
pub const DEFAULT_TARGET_REFERENCE_FIELD: &str = "identity";
/// Default node property holding the document content.
pub const DEFAULT_TARGET_CONTENT_FIELD: &str = "content";
/// Default metadata field carrying the document key.
pub const DEFAULT_SOURCE_REFERENCE_FIELD: &str = "document.reference";
/// Default separator for multi-valued fields.
pub const DEFAULT_MULTI_VALUES_JOINER: &str = "|";
/// Default relationship type.
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "PARENT_OF";
/// Default metadata field listing related document keys.
pub const DEFAULT_SOURCE_PROPERTY_KEY: &str = "collector.referrer-reference";
/// Default property identifying related nodes.
pub const DEFAULT_TARGET_PROPERTY_KEY: &str = "document.reference";

/// Node layout used to represent one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    /// One node with metadata and content.
    #[default]
    #[serde(alias = "one_node")]
    SingleNode,
    /// One node with metadata only.
    #[serde(alias = "no_content")]
    MetadataOnly,
    /// Key node linked to separate content and metadata nodes.
    #[serde(alias = "splitted")]
    Split,
    /// User supplied Cypher for upsert and delete.
    Template,
}

impl TopologyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleNode => "single_node",
            Self::MetadataOnly => "metadata_only",
            Self::Split => "split",
            Self::Template => "template",
        }
    }
}

/// Direction of a relationship, seen from the committed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// document -> target
    Outgoing,
    /// target -> document
    Incoming,
    /// Two edges, one per direction.
    Both,
    /// A single edge whose direction carries no meaning.
    #[default]
    None,
}

/// How the node at the other end of a relationship is located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FindMode {
    /// Link only to nodes that already exist.
    Match,
    /// Create the target node when missing.
    #[default]
    Merge,
}

impl FindMode {
    /// The Cypher clause keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::Merge => "MERGE",
        }
    }
}

/// Connects the document node to other document nodes named in a metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipRule {
    #[serde(rename = "type")]
    pub relationship_type: String,
    pub source_property_key: String,
    pub target_property_key: String,
    pub direction: Direction,
    pub target_find_mode: FindMode,
}

impl Default for RelationshipRule {
    fn default() -> Self {
        Self {
            relationship_type: DEFAULT_RELATIONSHIP_TYPE.to_string(),
            source_property_key: DEFAULT_SOURCE_PROPERTY_KEY.to_string(),
            target_property_key: DEFAULT_TARGET_PROPERTY_KEY.to_string(),
            direction: Direction::default(),
            target_find_mode: FindMode::default(),
        }
    }
}

impl RelationshipRule {
    pub fn new(
        relationship_type: impl Into<String>,
        source_property_key: impl Into<String>,
        target_property_key: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            relationship_type: relationship_type.into(),
            source_property_key: source_property_key.into(),
            target_property_key: target_property_key.into(),
            direction,
            target_find_mode: FindMode::Merge,
        }
    }

    pub fn with_find_mode(mut self, mode: FindMode) -> Self {
        self.target_find_mode = mode;
        self
    }
}

/// Adds a label taken from a metadata field.
///
/// With `keep = false` the field is dropped from the stored metadata once it
/// has been used as a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalLabelRule {
    pub source_field: String,
    #[serde(default = "default_keep")]
    pub keep: bool,
}

fn default_keep() -> bool {
    true
}

impl AdditionalLabelRule {
    pub fn new(source_field: impl Into<String>, keep: bool) -> Self {
        Self {
            source_field: source_field.into(),
            keep,
        }
    }
}

/// Raw Cypher used by the template topology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub upsert_cypher: String,
    pub delete_cypher: String,
    /// Parameters bound to null when the document has no such field.
    pub optional_parameters: Vec<String>,
    /// Parameter receiving the document key, when set.
    pub node_id_property: String,
    /// Parameter receiving the document content, when set.
    pub node_content_property: String,
}

/// Everything the synthesis engine needs to turn documents into graph writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphWriteConfig {
    pub primary_label: String,
    /// Metadata field holding the document key; falls back to the reference.
    pub source_reference_field: String,
    /// Node property the key is stored and matched on.
    pub target_reference_field: String,
    /// Metadata field used as content when an upsert carries no stream.
    pub source_content_field: String,
    /// Node property holding the content.
    pub target_content_field: String,
    pub multi_values_joiner: String,
    pub topology: TopologyKind,
    pub additional_labels: Vec<AdditionalLabelRule>,
    pub relationships: Vec<RelationshipRule>,
    pub template: Option<TemplateConfig>,
}

impl Default for GraphWriteConfig {
    fn default() -> Self {
        Self {
            primary_label: DEFAULT_PRIMARY_LABEL.to_string(),
            source_reference_field: DEFAULT_SOURCE_REFERENCE_FIELD.to_string(),
            target_reference_field: DEFAULT_TARGET_REFERENCE_FIELD.to_string(),
            source_content_field: String::new(),
            target_content_field: DEFAULT_TARGET_CONTENT_FIELD.to_string(),
            multi_values_joiner: DEFAULT_MULTI_VALUES_JOINER.to_string(),
            topology: TopologyKind::default(),
            additional_labels: Vec::new(),
            relationships: Vec::new(),
            template: None,
        }
    }
}

impl GraphWriteConfig {
    /// Check the invariants the synthesis engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topology == TopologyKind::Template {
            let template = self
                .template
                .as_ref()
                .ok_or(ConfigError::MissingTemplate("a [graph.template] table"))?;
            if template.upsert_cypher.trim().is_empty() {
                return Err(ConfigError::MissingTemplate("upsert_cypher"));
            }
            if template.delete_cypher.trim().is_empty() {
                return Err(ConfigError::MissingTemplate("delete_cypher"));
            }
            return Ok(());
        }

        if self.target_reference_field.trim().is_empty() {
            return Err(ConfigError::MissingField("target_reference_field"));
        }
        if self.primary_label.trim().is_empty() {
            return Err(ConfigError::MissingField("primary_label"));
        }
        if self.topology != TopologyKind::MetadataOnly
            && self.target_content_field.trim().is_empty()
        {
            return Err(ConfigError::MissingField("target_content_field"));
        }

        for (index, rule) in self.additional_labels.iter().enumerate() {
            if rule.source_field.trim().is_empty() {
                return Err(ConfigError::label_rule(index, "source_field is empty"));
            }
        }

        for (index, rule) in self.relationships.iter().enumerate() {
            if rule.relationship_type.trim().is_empty() {
                return Err(ConfigError::relationship(index, "type is empty"));
            }
            if rule.source_property_key.trim().is_empty() {
                return Err(ConfigError::relationship(index, "source_property_key is empty"));
            }
            if rule.target_property_key.trim().is_empty() {
                return Err(ConfigError::relationship(index, "target_property_key is empty"));
            }
        }

        Ok(())
    }
}
