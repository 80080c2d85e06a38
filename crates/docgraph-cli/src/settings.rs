//! Settings file: connection and graph write configuration.
//!
//! ```toml
//! [connection]
//! uri = "bolt://localhost:7687"
//! user = "neo4j"
//!
//! [graph]
//! primary_label = "Page"
//! topology = "split"
//!
//! [[graph.relationships]]
//! type = "LINKS_TO"
//! source_property_key = "links"
//! target_property_key = "identity"
//! direction = "OUTGOING"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use docgraph_core::GraphWriteConfig;
use docgraph_graph::ConnectionConfig;

pub const DEFAULT_SETTINGS_FILE: &str = "docgraph.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub graph: GraphWriteConfig,
}

impl Settings {
    /// Load an explicit file, or `docgraph.toml` from the working directory
    /// when it exists, or fall back to defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(DEFAULT_SETTINGS_FILE);
                if default.exists() {
                    Self::load(&default)
                } else {
                    debug!("No settings file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = Self::parse(&raw)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        debug!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Parse and validate settings text.
    pub fn parse(raw: &str) -> Result<Self> {
        let settings: Self = toml::from_str(raw)?;
        settings.graph.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgraph_core::{Direction, FindMode, TopologyKind};

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.connection.uri, "bolt://localhost:7687");
        assert_eq!(settings.graph, GraphWriteConfig::default());
    }

    #[test]
    fn test_full_settings() {
        let raw = r#"
            [connection]
            uri = "neo4j://graph:7687"
            password = "secret"
            database = "docs"

            [graph]
            primary_label = "Page"
            topology = "splitted"
            multi_values_joiner = ";"

            [[graph.additional_labels]]
            source_field = "category"
            keep = false

            [[graph.relationships]]
            type = "LINKS_TO"
            source_property_key = "links"
            target_property_key = "identity"
            direction = "BOTH"
            target_find_mode = "MATCH"
        "#;
        let settings = Settings::parse(raw).unwrap();

        assert_eq!(settings.connection.uri, "neo4j://graph:7687");
        assert_eq!(settings.connection.user, "neo4j");
        assert_eq!(settings.connection.database, "docs");
        assert_eq!(settings.graph.topology, TopologyKind::Split);
        assert_eq!(settings.graph.multi_values_joiner, ";");
        assert!(!settings.graph.additional_labels[0].keep);
        let rule = &settings.graph.relationships[0];
        assert_eq!(rule.direction, Direction::Both);
        assert_eq!(rule.target_find_mode, FindMode::Match);
    }

    #[test]
    fn test_invalid_graph_config_rejected() {
        let raw = r#"
            [graph]
            topology = "template"
        "#;
        assert!(Settings::parse(raw).is_err());
    }

    #[test]
    fn test_unknown_table_rejected() {
        assert!(Settings::parse("[neo4j]\nuri = \"x\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = Settings::discover(Some(Path::new("/nonexistent/docgraph.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/docgraph.toml"));
    }
}
