use super::enums::ListStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A curated, ordered collection of items under a topic.
///
/// `topic_id` is nullable: deleting a topic orphans its lists instead of
/// destroying them. `lock_user` is the reviewer currently holding the
/// exclusive review lock and may only be set while the list is submitted.
/// `parent_list` and `version` track the clone lineage of published lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<Uuid>,
    pub active: bool,
    pub status: ListStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_user: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_list: Option<Uuid>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    pub fn new(title: String, description: String, topic_id: Option<Uuid>, creator: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            topic_id,
            active: true,
            status: ListStatus::Draft,
            creator,
            lock_user: None,
            parent_list: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the given actor created the list. Lists with no recorded
    /// creator have no owner and fail every creator check.
    pub fn is_creator(&self, actor: Uuid) -> bool {
        self.creator == Some(actor)
    }

    /// True when the given actor holds the review lock.
    pub fn is_locked_by(&self, actor: Uuid) -> bool {
        self.lock_user == Some(actor)
    }
}

/// A single item in a list. Items are exclusively owned by their list and
/// carry an explicit position among their siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Unbounded long-form text behind the short description.
    #[serde(default)]
    pub deep_dive: String,
    pub active: bool,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListItem {
    pub fn new(list_id: Uuid, title: String, description: String, deep_dive: String, position: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            list_id,
            title,
            description,
            deep_dive,
            active: true,
            position,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Free-text discussion attached to a list. Append-only: rows are never
/// edited after creation beyond the modified timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListComment {
    pub id: Uuid,
    pub list_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Uuid>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListComment {
    pub fn new(list_id: Uuid, author: Option<Uuid>, message: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            list_id,
            author,
            message,
            created_at: now,
            updated_at: now,
        }
    }
}
