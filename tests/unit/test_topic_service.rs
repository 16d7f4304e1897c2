//! Unit tests for the topic service over an in-memory store.

use list_curation_api::models::{EntityKind, TopicNode};
use list_curation_api::services::search_projection::{IndexOp, IndexSink, RecordingSink};
use list_curation_api::services::{CurationError, TopicService};
use list_curation_api::storage::{CurationStore, SqliteStore};
use std::sync::Arc;
use uuid::Uuid;

fn service() -> (TopicService, Arc<RecordingSink>) {
    let store: Arc<dyn CurationStore> = Arc::new(SqliteStore::in_memory().unwrap());
    let sink = Arc::new(RecordingSink::new());
    let index: Arc<dyn IndexSink> = sink.clone();
    (TopicService::new(store, index), sink)
}

async fn chain(topics: &TopicService) -> (TopicNode, TopicNode, TopicNode) {
    let a = topics.create_topic("A".to_string(), String::new()).await.unwrap();
    let b = topics.create_topic("B".to_string(), String::new()).await.unwrap();
    let c = topics.create_topic("C".to_string(), String::new()).await.unwrap();
    topics.create_edge(a.id, b.id, String::new()).await.unwrap();
    topics.create_edge(b.id, c.id, String::new()).await.unwrap();
    (a, b, c)
}

#[tokio::test]
async fn test_create_and_get_topic() {
    let (topics, sink) = service();
    let created = topics
        .create_topic("Endocrinology".to_string(), "Hormones".to_string())
        .await
        .unwrap();

    let fetched = topics.get_topic(created.id).await.unwrap();
    assert_eq!(fetched.name, "Endocrinology");

    // Creation handed a document to the index sink.
    assert!(matches!(
        sink.ops().as_slice(),
        [IndexOp::Upsert { kind: EntityKind::Topic, .. }]
    ));
}

#[tokio::test]
async fn test_empty_name_rejected() {
    let (topics, _) = service();
    let err = topics.create_topic("  ".to_string(), String::new()).await.unwrap_err();
    assert!(matches!(err, CurationError::Validation { field: "name", .. }));
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (topics, _) = service();
    let err = topics.get_topic(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CurationError::NotFound { .. }));

    let err = topics.descendants(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CurationError::NotFound { .. }));
}

#[tokio::test]
async fn test_self_loop_rejected() {
    let (topics, _) = service();
    let a = topics.create_topic("A".to_string(), String::new()).await.unwrap();
    let err = topics.create_edge(a.id, a.id, String::new()).await.unwrap_err();
    assert!(matches!(err, CurationError::Validation { .. }));
}

#[tokio::test]
async fn test_cycle_rejected() {
    let (topics, _) = service();
    let (a, _, c) = chain(&topics).await;
    let err = topics.create_edge(c.id, a.id, String::new()).await.unwrap_err();
    assert!(matches!(err, CurationError::Validation { .. }));
}

#[tokio::test]
async fn test_edge_to_unknown_node_is_not_found() {
    let (topics, _) = service();
    let a = topics.create_topic("A".to_string(), String::new()).await.unwrap();
    let err = topics
        .create_edge(a.id, Uuid::new_v4(), String::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CurationError::NotFound { .. }));
}

#[tokio::test]
async fn test_root_leaf_classification() {
    let (topics, _) = service();
    let (a, b, c) = chain(&topics).await;
    let isolated = topics.create_topic("Isolated".to_string(), String::new()).await.unwrap();

    assert!(topics.is_root(a.id).await.unwrap());
    assert!(!topics.is_leaf(a.id).await.unwrap());

    assert!(!topics.is_root(b.id).await.unwrap());
    assert!(!topics.is_leaf(b.id).await.unwrap());

    assert!(topics.is_leaf(c.id).await.unwrap());
    assert!(!topics.is_root(c.id).await.unwrap());

    // A node with no edges at all is neither root nor leaf.
    assert!(!topics.is_root(isolated.id).await.unwrap());
    assert!(!topics.is_leaf(isolated.id).await.unwrap());
}

#[tokio::test]
async fn test_descendants_and_ancestors() {
    let (topics, _) = service();
    let (a, b, c) = chain(&topics).await;

    let ids = topics.descendant_ids(a.id).await.unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&b.id) && ids.contains(&c.id));

    let up = topics.ancestors(c.id).await.unwrap();
    assert_eq!(up.len(), 2);

    assert!(topics.is_ancestor_of(a.id, c.id).await.unwrap());
    assert!(!topics.is_ancestor_of(c.id, a.id).await.unwrap());
}

#[tokio::test]
async fn test_multi_parent_node() {
    let (topics, _) = service();
    let a = topics.create_topic("A".to_string(), String::new()).await.unwrap();
    let b = topics.create_topic("B".to_string(), String::new()).await.unwrap();
    let shared = topics.create_topic("Shared".to_string(), String::new()).await.unwrap();
    topics.create_edge(a.id, shared.id, String::new()).await.unwrap();
    topics.create_edge(b.id, shared.id, String::new()).await.unwrap();

    assert!(topics.is_ancestor_of(a.id, shared.id).await.unwrap());
    assert!(topics.is_ancestor_of(b.id, shared.id).await.unwrap());
    assert_eq!(topics.descendant_ids(a.id).await.unwrap(), vec![shared.id]);
}

#[tokio::test]
async fn test_delete_topic_emits_index_removal() {
    let (topics, sink) = service();
    let a = topics.create_topic("Doomed".to_string(), String::new()).await.unwrap();
    topics.delete_topic(a.id).await.unwrap();

    let ops = sink.ops();
    assert!(matches!(
        ops.last(),
        Some(IndexOp::Remove { kind: EntityKind::Topic, id }) if *id == a.id
    ));

    let err = topics.get_topic(a.id).await.unwrap_err();
    assert!(matches!(err, CurationError::NotFound { .. }));
}
