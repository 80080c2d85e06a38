//! Neo4j session: owns the driver pool and runs statements as write transactions.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use docgraph_core::ConfigError;

use crate::cypher::quote;
use crate::error::{GraphError, GraphResult};
use crate::params::CypherStatement;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            max_connections: 4,
            fetch_size: 200,
        }
    }
}

/// Executes statements against the store.
///
/// Every `execute` call is its own write transaction. After `close` no
/// further statement may run.
#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Run one statement inside a single write transaction.
    async fn execute(&self, statement: &CypherStatement) -> GraphResult<()>;

    /// Release the connection. Calling it again has no effect.
    async fn close(&self) -> GraphResult<()>;
}

/// [`GraphSession`] backed by a neo4rs connection pool.
///
/// Each transaction checks a connection out of the pool, so writes stay
/// isolated from each other without opening a new socket per document.
pub struct Neo4jSession {
    graph: RwLock<Option<Graph>>,
}

impl Neo4jSession {
    /// Open the pool and verify the server answers.
    ///
    /// `Graph::connect` only builds the pool; the `RETURN 1` ping forces a
    /// real handshake so an unreachable server fails here.
    pub async fn open(config: &ConnectionConfig) -> GraphResult<Self> {
        if config.uri.trim().is_empty() {
            return Err(ConfigError::MissingField("connection.uri").into());
        }

        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections.max(1))
            .fetch_size(config.fetch_size.max(1))
            .build()?;

        let graph = Graph::connect(neo4j_config).await?;
        graph.run(Query::new("RETURN 1".to_string())).await?;

        info!(uri = %config.uri, database = %config.database, "Neo4j session opened");
        Ok(Self::from_graph(graph))
    }

    /// Wrap an already connected pool.
    pub fn from_graph(graph: Graph) -> Self {
        Self {
            graph: RwLock::new(Some(graph)),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.graph.read().await.is_none()
    }

    async fn graph(&self) -> GraphResult<Graph> {
        self.graph
            .read()
            .await
            .as_ref()
            .cloned()
            .ok_or(GraphError::SessionClosed)
    }

    /// Run a read statement and collect its rows.
    pub async fn query(&self, statement: &CypherStatement) -> GraphResult<Vec<Row>> {
        let graph = self.graph().await?;
        let mut result = graph.execute(statement.to_query()).await?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run a read statement returning a single integer column.
    pub async fn query_count(&self, statement: &CypherStatement, field: &str) -> GraphResult<i64> {
        let rows = self.query(statement).await?;
        match rows.into_iter().next() {
            Some(row) => row
                .get::<i64>(field)
                .map_err(|e| GraphError::Decode(format!("field '{}': {:?}", field, e))),
            None => Ok(0),
        }
    }

    /// Node and relationship counts for nodes carrying `label`.
    pub async fn counts(&self, label: &str) -> GraphResult<GraphCounts> {
        let label = quote(label);
        let nodes = CypherStatement::new(format!("MATCH (n:{}) RETURN count(n) AS count", label));
        let relationships = CypherStatement::new(format!(
            "MATCH (:{})-[r]->() RETURN count(r) AS count",
            label
        ));

        let nodes = self.query_count(&nodes, "count").await?;
        let relationships = self.query_count(&relationships, "count").await?;

        Ok(GraphCounts {
            nodes: nodes.max(0) as usize,
            relationships: relationships.max(0) as usize,
        })
    }
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn execute(&self, statement: &CypherStatement) -> GraphResult<()> {
        let graph = self.graph().await?;
        let mut txn = graph.start_txn().await?;

        if let Err(e) = txn.run(statement.to_query()).await {
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %rollback, "Rollback failed");
            }
            return Err(e.into());
        }
        txn.commit().await?;

        debug!(params = statement.params.len(), "Write transaction committed");
        Ok(())
    }

    async fn close(&self) -> GraphResult<()> {
        if self.graph.write().await.take().is_some() {
            info!("Neo4j session closed");
        }
        Ok(())
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.database, "neo4j");
        assert_eq!(config.max_connections, 4);
    }

    #[tokio::test]
    async fn test_open_requires_uri() {
        let config = ConnectionConfig {
            uri: String::new(),
            ..Default::default()
        };
        match Neo4jSession::open(&config).await {
            Err(GraphError::Config(ConfigError::MissingField(field))) => {
                assert_eq!(field, "connection.uri")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("session opened without a uri"),
        }
    }
}
