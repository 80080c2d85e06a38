//! Round trips against a live Neo4j.
//!
//! Run with a server available:
//!
//! ```sh
//! DOCGRAPH_TEST_NEO4J_URI=bolt://localhost:7687 DOCGRAPH_TEST_NEO4J_PASSWORD=secret \
//!     cargo test -p docgraph-graph --test neo4j_roundtrip -- --ignored
//! ```
//!
//! Every test writes under a fresh label so runs do not see each other.

use docgraph_core::{
    AdditionalLabelRule, ContentStream, Direction, DocumentOperation, GraphWriteConfig, Metadata,
    RelationshipRule, TopologyKind,
};
use docgraph_graph::{BatchDispatcher, ConnectionConfig, CypherStatement, Neo4jSession};

fn connection() -> ConnectionConfig {
    ConnectionConfig {
        uri: std::env::var("DOCGRAPH_TEST_NEO4J_URI")
            .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
        user: std::env::var("DOCGRAPH_TEST_NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
        password: std::env::var("DOCGRAPH_TEST_NEO4J_PASSWORD").unwrap_or_default(),
        ..Default::default()
    }
}

fn config(topology: TopologyKind) -> GraphWriteConfig {
    let label = format!("Doc{}", uuid::Uuid::new_v4().simple());
    GraphWriteConfig {
        primary_label: label,
        target_reference_field: "id".to_string(),
        target_content_field: "body".to_string(),
        topology,
        ..Default::default()
    }
}

async fn dispatcher(config: GraphWriteConfig) -> BatchDispatcher<Neo4jSession> {
    let session = Neo4jSession::open(&connection()).await.unwrap();
    BatchDispatcher::new(config, session).unwrap()
}

async fn count(dispatcher: &BatchDispatcher<Neo4jSession>, cypher: String) -> i64 {
    dispatcher
        .session()
        .query_count(&CypherStatement::new(cypher), "count")
        .await
        .unwrap()
}

async fn count_label(dispatcher: &BatchDispatcher<Neo4jSession>, label: &str) -> i64 {
    count(dispatcher, format!("MATCH (n:`{}`) RETURN count(n) AS count", label)).await
}

async fn cleanup(dispatcher: &BatchDispatcher<Neo4jSession>) {
    let label = &dispatcher.config().primary_label;
    for suffix in ["", "_content", "_metadata"] {
        let statement =
            CypherStatement::new(format!("MATCH (n:`{}{}`) DETACH DELETE n", label, suffix));
        let _ = dispatcher.session().query(&statement).await;
    }
    dispatcher.close().await.unwrap();
}

fn doc(reference: &str) -> DocumentOperation {
    DocumentOperation::upsert(
        reference,
        Metadata::new().with("title", ["Hello"]),
        Some(ContentStream::from_text("body text")),
    )
}

#[tokio::test]
#[ignore = "requires a running Neo4j instance"]
async fn test_store_then_delete_leaves_nothing() {
    for topology in [TopologyKind::SingleNode, TopologyKind::MetadataOnly, TopologyKind::Split] {
        let dispatcher = dispatcher(config(topology)).await;
        let label = dispatcher.config().primary_label.clone();

        dispatcher.store(doc("doc1")).await.unwrap();
        assert_eq!(count_label(&dispatcher, &label).await, 1);

        dispatcher
            .delete(DocumentOperation::delete("doc1", Metadata::new()))
            .await
            .unwrap();
        assert_eq!(count_label(&dispatcher, &label).await, 0);
        assert_eq!(count_label(&dispatcher, &format!("{}_content", label)).await, 0);
        assert_eq!(count_label(&dispatcher, &format!("{}_metadata", label)).await, 0);

        // deleting again is a no-op
        dispatcher
            .delete(DocumentOperation::delete("doc1", Metadata::new()))
            .await
            .unwrap();

        cleanup(&dispatcher).await;
    }
}

#[tokio::test]
#[ignore = "requires a running Neo4j instance"]
async fn test_store_is_idempotent() {
    for topology in [TopologyKind::SingleNode, TopologyKind::MetadataOnly, TopologyKind::Split] {
        let dispatcher = dispatcher(config(topology)).await;
        let label = dispatcher.config().primary_label.clone();

        dispatcher.commit(vec![doc("doc1"), doc("doc1")]).await.unwrap();
        assert_eq!(count_label(&dispatcher, &label).await, 1);
        if topology == TopologyKind::Split {
            assert_eq!(count_label(&dispatcher, &format!("{}_content", label)).await, 1);
            assert_eq!(count_label(&dispatcher, &format!("{}_metadata", label)).await, 1);
        }

        cleanup(&dispatcher).await;
    }
}

#[tokio::test]
#[ignore = "requires a running Neo4j instance"]
async fn test_single_node_properties() {
    let mut config = config(TopologyKind::SingleNode);
    config.multi_values_joiner = ";".to_string();
    config.additional_labels = vec![
        AdditionalLabelRule::new("dropped", false),
        AdditionalLabelRule::new("kept", true),
    ];
    let dispatcher = dispatcher(config).await;
    let label = dispatcher.config().primary_label.clone();

    let meta = Metadata::new()
        .with("title", ["Hello"])
        .with("tags", ["a", "b"])
        .with("dropped", ["v"])
        .with("kept", ["w"]);
    dispatcher
        .store(DocumentOperation::upsert(
            "doc1",
            meta,
            Some(ContentStream::from_text("body text")),
        ))
        .await
        .unwrap();

    let matched = count(
        &dispatcher,
        format!(
            "MATCH (n:`{}`:`v`:`w` {{id: 'doc1', title: 'Hello', body: 'body text', tags: 'a;b', kept: 'w'}}) \
             WHERE n.dropped IS NULL RETURN count(n) AS count",
            label
        ),
    )
    .await;
    assert_eq!(matched, 1);

    cleanup(&dispatcher).await;
}

#[tokio::test]
#[ignore = "requires a running Neo4j instance"]
async fn test_relationship_directions() {
    for (direction, expected) in [(Direction::Both, 2), (Direction::None, 1), (Direction::Outgoing, 1)] {
        let mut config = config(TopologyKind::SingleNode);
        config.relationships = vec![RelationshipRule::new("LINKS_TO", "links", "id", direction)];
        let dispatcher = dispatcher(config).await;
        let label = dispatcher.config().primary_label.clone();

        let meta = Metadata::new().with("links", ["y", "x"]);
        dispatcher
            .store(DocumentOperation::upsert("x", meta.clone(), None))
            .await
            .unwrap();
        // repeating the upsert must not duplicate edges
        dispatcher
            .store(DocumentOperation::upsert("x", meta, None))
            .await
            .unwrap();

        let edges = count(
            &dispatcher,
            format!(
                "MATCH (:`{l}` {{id: 'x'}})-[r:LINKS_TO]-(:`{l}` {{id: 'y'}}) RETURN count(r) AS count",
                l = label
            ),
        )
        .await;
        assert_eq!(edges, expected, "direction {:?}", direction);

        let self_loops = count(
            &dispatcher,
            format!("MATCH (n:`{}`)-[r:LINKS_TO]->(n) RETURN count(r) AS count", label),
        )
        .await;
        assert_eq!(self_loops, 0);

        cleanup(&dispatcher).await;
    }
}

#[tokio::test]
#[ignore = "requires a running Neo4j instance"]
async fn test_missing_relationship_field_and_match_mode() {
    let mut config = config(TopologyKind::SingleNode);
    config.relationships = vec![
        RelationshipRule::new("CHILD_OF", "parent", "id", Direction::Outgoing)
            .with_find_mode(docgraph_core::FindMode::Match),
        RelationshipRule::new("LINKS_TO", "links", "id", Direction::Outgoing),
    ];
    let dispatcher = dispatcher(config).await;
    let label = dispatcher.config().primary_label.clone();

    // MATCH target missing: no node, no edge, and the next rule still applies
    let meta = Metadata::new().with("parent", ["ghost"]).with("links", ["y"]);
    dispatcher
        .store(DocumentOperation::upsert("x", meta, None))
        .await
        .unwrap();
    // no relationship fields at all
    dispatcher
        .store(DocumentOperation::upsert("z", Metadata::new(), None))
        .await
        .unwrap();

    assert_eq!(count_label(&dispatcher, &label).await, 3);
    let edges = count(
        &dispatcher,
        format!("MATCH (:`{}`)-[r]->() RETURN count(r) AS count", label),
    )
    .await;
    assert_eq!(edges, 1);

    cleanup(&dispatcher).await;
}

#[tokio::test]
#[ignore = "requires a running Neo4j instance"]
async fn test_closed_session_rejects_work() {
    let dispatcher = dispatcher(config(TopologyKind::SingleNode)).await;
    dispatcher.close().await.unwrap();
    assert!(dispatcher.session().is_closed().await);
    let err = dispatcher.store(doc("doc1")).await.unwrap_err();
    assert!(matches!(err.root(), docgraph_graph::GraphError::SessionClosed));
}
