//! # docgraph Graph
//!
//! Turns document upserts and deletes into Neo4j write transactions.
//!
//! Statement synthesis (`topology`, `relationship`, `labels`, `params`) is
//! pure and can be inspected without a database; `session` executes the
//! resulting statements and `dispatcher` drives a whole batch.

pub mod cypher;
pub mod dispatcher;
pub mod error;
pub mod labels;
pub mod params;
pub mod relationship;
pub mod schema;
pub mod session;
pub mod topology;

pub use dispatcher::{BatchDispatcher, CommitSummary};
pub use error::{GraphError, GraphResult};
pub use params::{CypherStatement, ParamValue, Parameters};
pub use session::{ConnectionConfig, GraphCounts, GraphSession, Neo4jSession};
pub use topology::Topology;
