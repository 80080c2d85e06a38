//! Error types for configuration and operation decoding.

use thiserror::Error;

/// Invalid or missing configuration. Fatal at startup, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    MissingField(&'static str),

    #[error("Invalid relationship rule #{index}: {reason}")]
    InvalidRelationship { index: usize, reason: String },

    #[error("Invalid additional label rule #{index}: {reason}")]
    InvalidLabelRule { index: usize, reason: String },

    #[error("Template topology requires {0}")]
    MissingTemplate(&'static str),
}

impl ConfigError {
    pub fn relationship(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRelationship {
            index,
            reason: reason.into(),
        }
    }

    pub fn label_rule(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidLabelRule {
            index,
            reason: reason.into(),
        }
    }
}

/// An operation kind the dispatcher does not know how to commit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported operation '{kind}' for document '{reference}'")]
pub struct UnsupportedOperation {
    pub kind: String,
    pub reference: String,
}
