//! Search index projection.
//!
//! Maps entity state to the document shape an external search index consumes.
//! Each indexable kind has a static field table — every projected field is
//! enumerable and testable, with no runtime reflection. The mapping functions
//! are pure; delivery goes through an [`IndexSink`], invoked after a mutation
//! commits and never awaited by the transition that triggered it.

use crate::models::{EntityKind, List, TopicNode};
use serde::Serialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Document handed to the external index for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct SearchDocument {
    pub id: Uuid,
    pub fields: Map<String, Value>,
}

/// One index mutation.
#[derive(Debug, Clone)]
pub enum IndexOp {
    Upsert {
        kind: EntityKind,
        document: SearchDocument,
    },
    Remove {
        kind: EntityKind,
        id: Uuid,
    },
}

/// Receiver for index mutations. Implementations must not block: the store
/// transaction that produced the op has already committed, and the services
/// hand the op off best-effort without waiting for index transport.
pub trait IndexSink: Send + Sync {
    fn apply(&self, op: IndexOp);
}

/// Default sink: logs the op and drops it. Stands in for the external
/// indexing collaborator when none is wired up.
pub struct TracingSink;

impl IndexSink for TracingSink {
    fn apply(&self, op: IndexOp) {
        match op {
            IndexOp::Upsert { kind, document } => {
                tracing::debug!(kind = %kind, id = %document.id, "index upsert")
            }
            IndexOp::Remove { kind, id } => {
                tracing::debug!(kind = %kind, %id, "index remove")
            }
        }
    }
}

/// Sink that records every op. Used by tests to assert what would have been
/// shipped to the index.
#[derive(Default)]
pub struct RecordingSink {
    ops: std::sync::Mutex<Vec<IndexOp>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<IndexOp> {
        self.ops.lock().map(|ops| ops.clone()).unwrap_or_default()
    }
}

impl IndexSink for RecordingSink {
    fn apply(&self, op: IndexOp) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.push(op);
        }
    }
}

type FieldExtractor<E> = fn(&E) -> Value;

/// Name-completion payload: inputs to complete on plus the id to resolve a
/// completion back to its entity.
fn suggest_payload(input: &str, id: Uuid) -> Value {
    json!({
        "input": [input],
        "payload": { "id": id },
    })
}

pub const LIST_FIELDS: &[(&str, FieldExtractor<List>)] = &[
    ("title", |list| json!(list.title)),
    ("description", |list| json!(list.description)),
    ("topic_id", |list| json!(list.topic_id)),
    ("status", |list| json!(list.status)),
    ("active", |list| json!(list.active)),
    ("version", |list| json!(list.version)),
    ("created_at", |list| json!(list.created_at)),
    ("suggest", |list| suggest_payload(&list.title, list.id)),
];

pub const TOPIC_FIELDS: &[(&str, FieldExtractor<TopicNode>)] = &[
    ("name", |topic| json!(topic.name)),
    ("description", |topic| json!(topic.description)),
    ("created_at", |topic| json!(topic.created_at)),
    ("suggest", |topic| suggest_payload(&topic.name, topic.id)),
];

fn project<E>(id: Uuid, entity: &E, table: &[(&str, FieldExtractor<E>)]) -> SearchDocument {
    let mut fields = Map::new();
    for (name, extract) in table {
        fields.insert((*name).to_string(), extract(entity));
    }
    SearchDocument { id, fields }
}

/// Project a list to its index document.
pub fn project_list(list: &List) -> SearchDocument {
    project(list.id, list, LIST_FIELDS)
}

/// Project a topic node to its index document.
pub fn project_topic(topic: &TopicNode) -> SearchDocument {
    project(topic.id, topic, TOPIC_FIELDS)
}

pub fn upsert_list(list: &List) -> IndexOp {
    IndexOp::Upsert {
        kind: EntityKind::List,
        document: project_list(list),
    }
}

pub fn upsert_topic(topic: &TopicNode) -> IndexOp {
    IndexOp::Upsert {
        kind: EntityKind::Topic,
        document: project_topic(topic),
    }
}

pub fn remove(kind: EntityKind, id: Uuid) -> IndexOp {
    IndexOp::Remove { kind, id }
}
