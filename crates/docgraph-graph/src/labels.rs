//! Additional labels taken from document metadata.

use docgraph_core::{AdditionalLabelRule, Metadata};

use crate::cypher::quote;

/// Labels to add to the primary node, and the metadata left to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelResolution {
    pub labels: Vec<String>,
    pub metadata: Metadata,
}

/// Apply label rules in declared order.
///
/// Each rule labels the node with the first non-blank value of its field.
/// Rules with `keep = false` remove the field from the returned metadata, so
/// later rules reading the same field find nothing. The caller's metadata is
/// never modified.
pub fn resolve_labels(rules: &[AdditionalLabelRule], metadata: &Metadata) -> LabelResolution {
    let mut remaining = metadata.clone();
    let mut labels = Vec::new();

    for rule in rules {
        let label = remaining
            .first(&rule.source_field)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string);
        if let Some(label) = label {
            labels.push(label);
        }
        if !rule.keep {
            remaining.remove(&rule.source_field);
        }
    }

    LabelResolution {
        labels,
        metadata: remaining,
    }
}

/// `var:`A`, var:`B`` for use inside a SET clause; empty when no labels.
pub fn set_items(var: &str, labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("{}:{}", var, quote(label)))
        .collect::<Vec<_>>()
        .join(", ")
}
