use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node in the topic classification graph.
///
/// Topics form a DAG, not a strict tree: a node may hang under several
/// parents. Edges live in [`TopicEdge`] rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicNode {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TopicNode {
    pub fn new(name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A directed parent → child edge between two topic nodes.
///
/// Self-loops are rejected at creation time; acyclicity is enforced by the
/// topic service before an edge is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicEdge {
    pub parent_id: Uuid,
    pub child_id: Uuid,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl TopicEdge {
    pub fn new(parent_id: Uuid, child_id: Uuid, description: String) -> Self {
        Self {
            parent_id,
            child_id,
            description,
            created_at: Utc::now(),
        }
    }
}
