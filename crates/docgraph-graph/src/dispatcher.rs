//! Batch commit: one write transaction per document operation.
//!
//! Operations run in order. The first failure aborts the rest of the batch;
//! operations already executed stay committed.

use docgraph_core::{DocumentOperation, GraphWriteConfig, OperationRecord};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{GraphError, GraphResult};
use crate::params::CypherStatement;
use crate::session::GraphSession;
use crate::topology::Topology;

/// Counts of committed operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub upserts: usize,
    pub deletes: usize,
}

impl CommitSummary {
    pub fn total(&self) -> usize {
        self.upserts + self.deletes
    }
}

/// Drives document operations through a topology into a [`GraphSession`].
///
/// Writes are serialized: at most one store or delete is in flight per
/// dispatcher, even when several callers commit batches concurrently.
pub struct BatchDispatcher<S: GraphSession> {
    config: GraphWriteConfig,
    topology: Topology,
    session: S,
    write_gate: Mutex<()>,
}

impl<S: GraphSession> BatchDispatcher<S> {
    /// Validate the configuration and take ownership of the session.
    pub fn new(config: GraphWriteConfig, session: S) -> GraphResult<Self> {
        let topology = Topology::from_config(&config)?;
        info!(
            topology = topology.name(),
            label = %config.primary_label,
            relationships = config.relationships.len(),
            "Batch dispatcher ready"
        );
        Ok(Self {
            config,
            topology,
            session,
            write_gate: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &GraphWriteConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// The statement an operation would run, without executing it.
    pub fn preview(&self, operation: DocumentOperation) -> GraphResult<CypherStatement> {
        self.topology.build(operation, &self.config)
    }

    /// Commit operations in order, stopping at the first failure.
    pub async fn commit<I>(&self, operations: I) -> GraphResult<CommitSummary>
    where
        I: IntoIterator<Item = DocumentOperation>,
    {
        self.commit_all(operations.into_iter().map(Ok::<_, GraphError>))
            .await
    }

    /// Commit decoded batch records. An unknown operation kind aborts the
    /// batch at that record.
    pub async fn commit_records<I>(&self, records: I) -> GraphResult<CommitSummary>
    where
        I: IntoIterator<Item = OperationRecord>,
    {
        self.commit_all(records.into_iter().map(DocumentOperation::try_from))
            .await
    }

    async fn commit_all<I, E>(&self, operations: I) -> GraphResult<CommitSummary>
    where
        I: Iterator<Item = Result<DocumentOperation, E>>,
        E: Into<GraphError>,
    {
        let mut summary = CommitSummary::default();

        for operation in operations {
            let result = match operation.map_err(Into::into) {
                Ok(op @ DocumentOperation::Upsert { .. }) => {
                    self.store(op).await.map(|_| summary.upserts += 1)
                }
                Ok(op @ DocumentOperation::Delete { .. }) => {
                    self.delete(op).await.map(|_| summary.deletes += 1)
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!(committed = summary.total(), error = %e, "Batch aborted");
                return Err(e);
            }
        }

        info!(upserts = summary.upserts, deletes = summary.deletes, "Batch committed");
        Ok(summary)
    }

    /// Upsert one document.
    pub async fn store(&self, operation: DocumentOperation) -> GraphResult<()> {
        self.write(operation).await
    }

    /// Delete one document. Deleting a document that is not stored is a no-op.
    pub async fn delete(&self, operation: DocumentOperation) -> GraphResult<()> {
        self.write(operation).await
    }

    async fn write(&self, operation: DocumentOperation) -> GraphResult<()> {
        let reference = operation.reference().to_string();
        let kind = operation.kind();

        let _guard = self.write_gate.lock().await;
        let statement = self
            .topology
            .build(operation, &self.config)
            .map_err(|e| e.for_reference(reference.as_str()))?;
        self.session
            .execute(&statement)
            .await
            .map_err(|e| e.for_reference(reference.as_str()))?;

        debug!(reference = %reference, kind, "Committed");
        Ok(())
    }

    /// Close the underlying session. Idempotent.
    pub async fn close(&self) -> GraphResult<()> {
        self.session.close().await
    }
}
