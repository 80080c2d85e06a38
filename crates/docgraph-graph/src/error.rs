//! Error types for the graph write path.

use docgraph_core::{ConfigError, UnsupportedOperation};
use thiserror::Error;

/// Failures surfaced while committing documents.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperation),

    #[error("Cannot read document content: {0}")]
    Io(#[from] std::io::Error),

    #[error("Neo4j error: {0}")]
    Store(#[from] neo4rs::Error),

    #[error("Unexpected query result: {0}")]
    Decode(String),

    #[error("Graph session is closed")]
    SessionClosed,

    #[error("Failed to commit '{reference}': {source}")]
    Operation {
        reference: String,
        #[source]
        source: Box<GraphError>,
    },
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Attach the reference of the document being committed.
    pub fn for_reference(self, reference: impl Into<String>) -> Self {
        match self {
            Self::Operation { .. } => self,
            other => Self::Operation {
                reference: reference.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying failure, without per-operation context.
    pub fn root(&self) -> &GraphError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }
}
