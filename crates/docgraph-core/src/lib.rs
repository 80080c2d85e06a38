//! docgraph Core Library
//!
//! Document operations and the graph write configuration shared by the
//! Cypher synthesis engine and the command line.

pub mod config;
pub mod error;
pub mod operation;

pub use config::{
    AdditionalLabelRule, Direction, FindMode, GraphWriteConfig, RelationshipRule,
    TemplateConfig, TopologyKind,
};
pub use error::{ConfigError, UnsupportedOperation};
pub use operation::{ContentStream, DocumentOperation, Metadata, OperationRecord};
