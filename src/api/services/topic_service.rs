//! Topic graph service.
//!
//! Owns creation and deletion of topic nodes and edges, and answers the
//! hierarchy queries (root/leaf classification, descendant and ancestor
//! traversal) by running the pure graph algorithms over an edge snapshot
//! from the store.

use crate::graph::{self, TraversalRow};
use crate::models::{EntityKind, TopicEdge, TopicNode};
use crate::services::search_projection::{self, IndexSink};
use crate::storage::CurationStore;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::CurationError;

/// Service for the topic hierarchy.
#[derive(Clone)]
pub struct TopicService {
    store: Arc<dyn CurationStore>,
    index: Arc<dyn IndexSink>,
}

impl TopicService {
    pub fn new(store: Arc<dyn CurationStore>, index: Arc<dyn IndexSink>) -> Self {
        Self { store, index }
    }

    pub async fn create_topic(
        &self,
        name: String,
        description: String,
    ) -> Result<TopicNode, CurationError> {
        if name.trim().is_empty() {
            return Err(CurationError::validation("name", "topic name must not be empty"));
        }
        let topic = self.store.create_topic(name, description).await?;
        info!(topic_id = %topic.id, name = %topic.name, "topic created");
        self.index.apply(search_projection::upsert_topic(&topic));
        Ok(topic)
    }

    pub async fn get_topic(&self, id: Uuid) -> Result<TopicNode, CurationError> {
        self.store
            .get_topic(id)
            .await?
            .ok_or_else(|| CurationError::not_found("topic", id))
    }

    /// Delete a node. Lists under it survive with their topic reference
    /// cleared; edges touching it are dropped.
    pub async fn delete_topic(&self, id: Uuid) -> Result<(), CurationError> {
        self.store.delete_topic(id).await?;
        info!(topic_id = %id, "topic deleted");
        self.index.apply(search_projection::remove(EntityKind::Topic, id));
        Ok(())
    }

    /// Create a parent → child edge.
    ///
    /// Rejects self-loops and edges that would close a cycle before anything
    /// is persisted.
    pub async fn create_edge(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
        description: String,
    ) -> Result<TopicEdge, CurationError> {
        if parent_id == child_id {
            return Err(CurationError::validation(
                "child_id",
                "a topic cannot be its own parent",
            ));
        }
        self.get_topic(parent_id).await?;
        self.get_topic(child_id).await?;

        let edges = self.store.topic_edges().await?;
        if graph::would_create_cycle(&edges, parent_id, child_id) {
            return Err(CurationError::validation(
                "child_id",
                "edge would make the topic graph cyclic",
            ));
        }

        Ok(self
            .store
            .create_topic_edge(parent_id, child_id, description)
            .await?)
    }

    /// Root = has at least one child and no parent. An isolated node is
    /// neither root nor leaf.
    pub async fn is_root(&self, id: Uuid) -> Result<bool, CurationError> {
        self.get_topic(id).await?;
        let edges = self.store.topic_edges().await?;
        Ok(graph::has_children(&edges, id) && !graph::has_parent(&edges, id))
    }

    /// Leaf = has a parent and no children.
    pub async fn is_leaf(&self, id: Uuid) -> Result<bool, CurationError> {
        self.get_topic(id).await?;
        let edges = self.store.topic_edges().await?;
        Ok(graph::has_parent(&edges, id) && !graph::has_children(&edges, id))
    }

    /// Every descendant with its depth and materialized path from `id`.
    pub async fn descendants(&self, id: Uuid) -> Result<Vec<TraversalRow>, CurationError> {
        self.get_topic(id).await?;
        let edges = self.store.topic_edges().await?;
        Ok(graph::descendants(&edges, id))
    }

    /// Descendant ids only, deduplicated.
    pub async fn descendant_ids(&self, id: Uuid) -> Result<Vec<Uuid>, CurationError> {
        self.get_topic(id).await?;
        let edges = self.store.topic_edges().await?;
        Ok(graph::descendant_ids(&edges, id))
    }

    /// Every ancestor with its depth and materialized path from `id`.
    pub async fn ancestors(&self, id: Uuid) -> Result<Vec<TraversalRow>, CurationError> {
        self.get_topic(id).await?;
        let edges = self.store.topic_edges().await?;
        Ok(graph::ancestors(&edges, id))
    }

    pub async fn is_ancestor_of(&self, ancestor: Uuid, node: Uuid) -> Result<bool, CurationError> {
        self.get_topic(ancestor).await?;
        self.get_topic(node).await?;
        let edges = self.store.topic_edges().await?;
        Ok(graph::is_ancestor_of(&edges, ancestor, node))
    }
}
