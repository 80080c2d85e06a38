//! Document operations handed over by the upstream collector.
//!
//! An operation is either an upsert (metadata plus an optional content
//! stream) or a delete. Operations are consumed by a single store/delete
//! call and discarded afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UnsupportedOperation;

/// Document metadata: field name to its ordered values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Vec<String>>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any previous values of `field`.
    pub fn with<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0
            .insert(field.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// All values of a field, if present.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First value of a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Replace a field with a single value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), vec![value.into()]);
    }

    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.0.remove(field)
    }

    /// A copy of this metadata without `field`.
    pub fn without(&self, field: &str) -> Self {
        let mut copy = self.clone();
        copy.remove(field);
        copy
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Document content, read at most once when the operation is committed.
pub struct ContentStream(Box<dyn Read + Send>);

impl ContentStream {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self(Box::new(reader))
    }

    /// Content already held in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Cursor::new(text.into().into_bytes()))
    }

    /// Content backed by a file that is only opened on first read, so a
    /// missing file surfaces as an I/O failure of the commit itself.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(LazyFile {
            path: path.into(),
            file: None,
        })
    }

    /// Drain the stream as UTF-8 text.
    pub fn read_to_string(mut self) -> io::Result<String> {
        let mut text = String::new();
        self.0.read_to_string(&mut text)?;
        Ok(text)
    }
}

impl fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentStream(..)")
    }
}

struct LazyFile {
    path: PathBuf,
    file: Option<File>,
}

impl Read for LazyFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.file.is_none() {
            debug!(path = %self.path.display(), "Opening content file");
            let file = File::open(&self.path).map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("cannot open content file {}: {}", self.path.display(), e),
                )
            })?;
            self.file = Some(file);
        }
        match self.file.as_mut() {
            Some(file) => file.read(buf),
            None => Ok(0),
        }
    }
}

/// A single document operation.
#[derive(Debug)]
pub enum DocumentOperation {
    Upsert {
        reference: String,
        metadata: Metadata,
        content: Option<ContentStream>,
    },
    Delete {
        reference: String,
        metadata: Metadata,
    },
}

impl DocumentOperation {
    pub fn upsert(
        reference: impl Into<String>,
        metadata: Metadata,
        content: Option<ContentStream>,
    ) -> Self {
        Self::Upsert {
            reference: reference.into(),
            metadata,
            content,
        }
    }

    pub fn delete(reference: impl Into<String>, metadata: Metadata) -> Self {
        Self::Delete {
            reference: reference.into(),
            metadata,
        }
    }

    pub fn reference(&self) -> &str {
        match self {
            Self::Upsert { reference, .. } | Self::Delete { reference, .. } => reference,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Upsert { metadata, .. } | Self::Delete { metadata, .. } => metadata,
        }
    }

    /// Operation kind as used in logs and batch files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upsert { .. } => "upsert",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Serialized form of an operation, one per line in a batch file.
///
/// `op` is free text so that unknown kinds reach the dispatcher and fail the
/// batch there instead of at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub op: String,
    pub reference: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_file: Option<PathBuf>,
}

impl TryFrom<OperationRecord> for DocumentOperation {
    type Error = UnsupportedOperation;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        match record.op.to_lowercase().as_str() {
            "upsert" => {
                let content = match (record.content, record.content_file) {
                    (Some(text), _) => Some(ContentStream::from_text(text)),
                    (None, Some(path)) => Some(ContentStream::from_path(path)),
                    (None, None) => None,
                };
                Ok(Self::upsert(record.reference, record.metadata, content))
            }
            "delete" => Ok(Self::delete(record.reference, record.metadata)),
            _ => Err(UnsupportedOperation {
                kind: record.op,
                reference: record.reference,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_first_and_remove() {
        let mut meta = Metadata::new()
            .with("title", ["Hello"])
            .with("tags", ["a", "b"]);
        assert_eq!(meta.first("tags"), Some("a"));
        assert_eq!(meta.get("tags").map(<[String]>::len), Some(2));
        assert_eq!(meta.remove("title"), Some(vec!["Hello".to_string()]));
        assert!(!meta.contains("title"));
        assert_eq!(meta.first("missing"), None);
    }

    #[test]
    fn test_without_leaves_original_untouched() {
        let meta = Metadata::new().with("content", ["big"]).with("title", ["t"]);
        let stripped = meta.without("content");
        assert!(meta.contains("content"));
        assert!(!stripped.contains("content"));
        assert_eq!(stripped.len(), 1);
    }

    #[test]
    fn test_content_from_text() {
        let content = ContentStream::from_text("body text");
        assert_eq!(content.read_to_string().unwrap(), "body text");
    }

    #[test]
    fn test_missing_content_file_fails_on_read() {
        let content = ContentStream::from_path("/nonexistent/docgraph/content.txt");
        let err = content.read_to_string().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_record_conversion() {
        let line = r#"{"op":"Upsert","reference":"doc1","metadata":{"title":["Hello"]},"content":"x"}"#;
        let record: OperationRecord = serde_json::from_str(line).unwrap();
        let op = DocumentOperation::try_from(record).unwrap();
        assert_eq!(op.kind(), "upsert");
        assert_eq!(op.reference(), "doc1");
        assert_eq!(op.metadata().first("title"), Some("Hello"));

        let line = r#"{"op":"delete","reference":"doc2"}"#;
        let record: OperationRecord = serde_json::from_str(line).unwrap();
        let op = DocumentOperation::try_from(record).unwrap();
        assert_eq!(op.kind(), "delete");
        assert!(op.metadata().is_empty());
    }

    #[test]
    fn test_unknown_record_kind() {
        let record = OperationRecord {
            op: "rename".to_string(),
            reference: "doc3".to_string(),
            metadata: Metadata::new(),
            content: None,
            content_file: None,
        };
        let err = DocumentOperation::try_from(record).unwrap_err();
        assert_eq!(err.kind, "rename");
        assert_eq!(err.reference, "doc3");
    }
}
