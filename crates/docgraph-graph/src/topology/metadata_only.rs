//! One node per document holding metadata only.
//!
//! A `content` metadata field is dropped as well, so a large payload never
//! ends up on the node by way of the metadata map.

use docgraph_core::GraphWriteConfig;

use super::{single_node, StoreInput};
use crate::cypher::CONTENT_FIELD;
use crate::params::CypherStatement;

pub(crate) fn store(config: &GraphWriteConfig, mut input: StoreInput) -> CypherStatement {
    input.metadata.remove(CONTENT_FIELD);
    single_node::node_statement(config, input, None)
}

pub(crate) fn delete(config: &GraphWriteConfig, source_id: String) -> CypherStatement {
    single_node::delete(config, source_id)
}
