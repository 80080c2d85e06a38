//! Statement text plus bind parameters, independent of the driver.

use std::collections::{BTreeMap, HashMap};

use docgraph_core::Metadata;
use neo4rs::{BoltNull, BoltType, Query};
use serde::Serialize;

/// A bind parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    String(String),
    List(Vec<String>),
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ParamValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(map: BTreeMap<String, ParamValue>) -> Self {
        Self::Map(map)
    }
}

impl From<ParamValue> for BoltType {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => BoltType::Null(BoltNull),
            ParamValue::String(s) => BoltType::from(s),
            ParamValue::List(values) => BoltType::from(values),
            ParamValue::Map(map) => {
                let map: HashMap<String, BoltType> = map
                    .into_iter()
                    .map(|(key, value)| (key, BoltType::from(value)))
                    .collect();
                BoltType::from(map)
            }
        }
    }
}

/// Parameters keyed by name.
pub type Parameters = BTreeMap<String, ParamValue>;

/// A Cypher statement ready to run in one write transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CypherStatement {
    pub text: String,
    pub params: Parameters,
}

impl CypherStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Parameters::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Convert into a driver query.
    pub fn to_query(&self) -> Query {
        self.params
            .iter()
            .fold(Query::new(self.text.clone()), |query, (key, value)| {
                query.param(key, BoltType::from(value.clone()))
            })
    }
}

/// Collapse a multi-valued field into one property value.
///
/// An empty joiner keeps the values as a list property.
pub fn join_values(values: &[String], joiner: &str) -> ParamValue {
    if joiner.is_empty() {
        ParamValue::List(values.to_vec())
    } else {
        ParamValue::String(values.join(joiner))
    }
}

/// Flatten metadata into a property map, one joined value per field.
pub fn flatten_metadata(metadata: &Metadata, joiner: &str) -> BTreeMap<String, ParamValue> {
    metadata
        .iter()
        .map(|(field, values)| (field.clone(), join_values(values, joiner)))
        .collect()
}
