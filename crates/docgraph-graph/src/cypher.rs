//! Cypher identifiers and the bind-parameter vocabulary shared by all topologies.
//!
//! Labels, relationship types and property keys cannot be bound as
//! parameters, so they are written into the statement text. They are quoted
//! with backticks; the values still come from configuration and document
//! metadata and should be restricted to trusted input.

/// Bind parameter carrying the document key.
pub const PARAM_SOURCE_ID: &str = "source_id";
/// Bind parameter carrying the flattened metadata map.
pub const PARAM_METADATA: &str = "source_metadata";
/// Bind parameter carrying the document content.
pub const PARAM_CONTENT: &str = "source_content";
/// Prefix of the per-relationship-rule target key lists.
pub const PARAM_SUBENTRIES: &str = "subentries";

/// Edge from a split primary node to its content node.
pub const WITH_CONTENT: &str = "WITH_CONTENT";
/// Edge from a split primary node to its metadata node.
pub const WITH_META: &str = "WITH_META";
/// Key property of the split content and metadata nodes.
pub const SATELLITE_KEY: &str = "source";

/// Metadata field never written by the metadata-only topology.
pub const CONTENT_FIELD: &str = "content";

/// Backtick-quote a label, relationship type or property key.
pub fn quote(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Name of the `i`-th relationship parameter (`subentries_<i>`).
pub fn subentries_param(index: usize) -> String {
    format!("{}_{}", PARAM_SUBENTRIES, index)
}

/// Label of the split content node.
pub fn content_label(primary_label: &str) -> String {
    format!("{}_content", primary_label)
}

/// Label of the split metadata node.
pub fn metadata_label(primary_label: &str) -> String {
    format!("{}_metadata", primary_label)
}

/// `(var:`Label` {`key`: $source_id})`
pub fn keyed_node(var: &str, label: &str, key: &str) -> String {
    format!("({}:{} {{{}: ${}}})", var, quote(label), quote(key), PARAM_SOURCE_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_and_embedded_backticks() {
        assert_eq!(quote("Doc"), "`Doc`");
        assert_eq!(quote("document.reference"), "`document.reference`");
        assert_eq!(quote("a`b"), "`a``b`");
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(subentries_param(2), "subentries_2");
        assert_eq!(content_label("Doc"), "Doc_content");
        assert_eq!(metadata_label("Doc"), "Doc_metadata");
        assert_eq!(keyed_node("a", "Doc", "id"), "(a:`Doc` {`id`: $source_id})");
    }
}
