//! Relationships from the committed node `a` to other document nodes.
//!
//! Every rule names a metadata field whose values are keys of related nodes.
//! Each value is expanded into its own related node (values are never
//! joined). A value equal to the document's own key is dropped, so a
//! document never links to itself. A rule becomes one `CALL { WITH a ... }` unit subquery so that a
//! rule producing no rows (no values, a self reference, or a `MATCH` with no
//! target) never stops the rules after it.
//!
//! ```cypher
//! WITH a CALL { WITH a UNWIND $subentries_0 AS sub WITH a, sub
//!        WHERE sub <> $source_id AND (a.`key` IS NULL OR a.`key` <> sub)
//!        MERGE (s:`Doc` {`key`: sub})
//!        MERGE (a)-[:`PARENT_OF`]-(s) }
//! ```

use docgraph_core::{Direction, Metadata, RelationshipRule};

use crate::cypher::{quote, subentries_param, PARAM_SOURCE_ID};
use crate::params::{ParamValue, Parameters};

/// Query text to append after the primary node clauses, plus its parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipFragments {
    pub text: String,
    pub params: Parameters,
}

/// Keys of the nodes a rule links to, in metadata order, without blanks and
/// without `source_id`.
pub fn target_values(rule: &RelationshipRule, metadata: &Metadata, source_id: &str) -> Vec<String> {
    metadata
        .get(&rule.source_property_key)
        .map(|values| {
            values
                .iter()
                .filter(|value| !value.trim().is_empty() && value.as_str() != source_id)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Edge-creating clauses between `a` and `s` for a direction.
///
/// `None` uses an undirected MERGE: it matches an existing edge in either
/// direction and otherwise creates exactly one, pointing from `a` to `s`.
fn edge_clauses(rule_type: &str, direction: Direction) -> String {
    let t = quote(rule_type);
    match direction {
        Direction::Outgoing => format!("MERGE (a)-[:{}]->(s)", t),
        Direction::Incoming => format!("MERGE (a)<-[:{}]-(s)", t),
        Direction::Both => format!("MERGE (a)-[:{t}]->(s) MERGE (a)<-[:{t}]-(s)", t = t),
        Direction::None => format!("MERGE (a)-[:{}]-(s)", t),
    }
}

/// The subquery for rule `index`.
pub fn fragment(index: usize, rule: &RelationshipRule, primary_label: &str) -> String {
    let key = quote(&rule.target_property_key);
    format!(
        " WITH a CALL {{ WITH a UNWIND ${param} AS sub WITH a, sub \
         WHERE sub <> ${source_id} AND (a.{key} IS NULL OR a.{key} <> sub) \
         {find} (s:{label} {{{key}: sub}}) {edges} }}",
        param = subentries_param(index),
        source_id = PARAM_SOURCE_ID,
        key = key,
        find = rule.target_find_mode.keyword(),
        label = quote(primary_label),
        edges = edge_clauses(&rule.relationship_type, rule.direction),
    )
}

/// Resolve all rules against a document's metadata.
///
/// Every rule binds `subentries_<i>`; only rules with at least one value
/// contribute query text.
pub fn resolve(
    rules: &[RelationshipRule],
    primary_label: &str,
    metadata: &Metadata,
    source_id: &str,
) -> RelationshipFragments {
    let mut fragments = RelationshipFragments::default();

    for (index, rule) in rules.iter().enumerate() {
        let values = target_values(rule, metadata, source_id);
        if !values.is_empty() {
            fragments.text.push_str(&fragment(index, rule, primary_label));
        }
        fragments
            .params
            .insert(subentries_param(index), ParamValue::List(values));
    }

    fragments
}
