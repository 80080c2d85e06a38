//! Batch files: one JSON operation record per line.
//!
//! ```json
//! {"op":"upsert","reference":"http://x/a","metadata":{"title":["A"]},"content":"..."}
//! {"op":"delete","reference":"http://x/b"}
//! ```

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use docgraph_core::OperationRecord;

/// Read records from a file, or from stdin when the path is `-`.
pub fn read_batch(path: &Path) -> Result<Vec<OperationRecord>> {
    if path.as_os_str() == "-" {
        return parse_batch(std::io::stdin().lock()).context("Failed to read batch from stdin");
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open batch file {}", path.display()))?;
    parse_batch(file).with_context(|| format!("Invalid batch file {}", path.display()))
}

/// Parse JSON lines. Blank lines are skipped.
pub fn parse_batch(reader: impl Read) -> Result<Vec<OperationRecord>> {
    let mut records = Vec::new();
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: OperationRecord = serde_json::from_str(&line)
            .with_context(|| format!("line {}: not an operation record", index + 1))?;
        records.push(record);
    }
    Ok(records)
}
