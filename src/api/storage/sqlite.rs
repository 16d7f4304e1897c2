//! SQLite storage backend implementation.
//!
//! Implements the `CurationStore` trait over a bundled SQLite database.
//! All guarded transitions are single conditional UPDATEs (the row's current
//! state is part of the WHERE clause), so competing writers race on the
//! database and exactly one wins. Multi-row effects (clone, bounty issuance,
//! bounty claim) run inside a transaction.

use super::{StorageError, traits::CurationStore};
use crate::models::{
    Bounty, BountyType, Contribution, EntityKind, FavoriteList, GroupMember, List, ListComment,
    ListItem, ListStatus, Person, Proposal, SubscriberGroup, Subscription, TargetRef, TopicEdge,
    TopicNode,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

const LIST_COLUMNS: &str = "id, title, description, topic_id, active, status, creator, lock_user, \
                            parent_list, version, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, list_id, title, description, deep_dive, active, position, created_at, updated_at";
const BOUNTY_COLUMNS: &str = "id, bounty_type_id, target_kind, target_id, issuer, claimer, \
                              reward_cents, active, date_expire, date_completed, created_at, updated_at";
const PROPOSAL_COLUMNS: &str = "id, target_kind, target_id, author, message, \
                                suggested_reward_cents, bounty_id, created_at, updated_at";

/// SQLite-backed curation store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::ConnectionError(format!("{db_path:?}: {e}")))?;
        Self::init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory store. Used by tests and ad hoc tooling.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS topics (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS topic_edges (
                parent_id   TEXT NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
                child_id    TEXT NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
                description TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL,
                PRIMARY KEY (parent_id, child_id),
                CHECK (parent_id <> child_id)
            );

            CREATE TABLE IF NOT EXISTS lists (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                topic_id    TEXT REFERENCES topics(id) ON DELETE SET NULL,
                active      INTEGER NOT NULL DEFAULT 1,
                status      TEXT NOT NULL DEFAULT 'draft',
                creator     TEXT,
                lock_user   TEXT,
                parent_list TEXT REFERENCES lists(id) ON DELETE RESTRICT,
                version     INTEGER NOT NULL DEFAULT 1,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                CHECK (lock_user IS NULL OR status = 'submitted')
            );
            CREATE INDEX IF NOT EXISTS idx_lists_topic ON lists(topic_id);
            CREATE INDEX IF NOT EXISTS idx_lists_status_created ON lists(status, created_at);

            CREATE TABLE IF NOT EXISTS list_items (
                id          TEXT PRIMARY KEY,
                list_id     TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
                title       TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                deep_dive   TEXT NOT NULL DEFAULT '',
                active      INTEGER NOT NULL DEFAULT 1,
                position    INTEGER NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_items_list ON list_items(list_id, position);

            CREATE TABLE IF NOT EXISTS list_comments (
                id         TEXT PRIMARY KEY,
                list_id    TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
                author     TEXT,
                message    TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_comments_list ON list_comments(list_id);

            CREATE TABLE IF NOT EXISTS persons (
                id                   TEXT PRIMARY KEY,
                degrees              TEXT NOT NULL DEFAULT '',
                job_title            TEXT NOT NULL DEFAULT '',
                personal_description TEXT NOT NULL DEFAULT '',
                created_at           TEXT NOT NULL,
                updated_at           TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS person_friends (
                person_id TEXT NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
                friend_id TEXT NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
                PRIMARY KEY (person_id, friend_id),
                CHECK (person_id <> friend_id)
            );

            CREATE TABLE IF NOT EXISTS favorite_lists (
                person_id  TEXT NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
                list_id    TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (person_id, list_id)
            );

            CREATE TABLE IF NOT EXISTS subscriber_groups (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS group_members (
                person_id  TEXT NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
                group_id   TEXT NOT NULL REFERENCES subscriber_groups(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (person_id, group_id)
            );

            CREATE TABLE IF NOT EXISTS subscriptions (
                id          TEXT PRIMARY KEY,
                group_id    TEXT NOT NULL REFERENCES subscriber_groups(id) ON DELETE CASCADE,
                topic_id    TEXT NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
                active      INTEGER NOT NULL DEFAULT 1,
                edit_power  INTEGER NOT NULL DEFAULT 0,
                price_cents INTEGER NOT NULL DEFAULT 0,
                date_expire TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_subscriptions_group ON subscriptions(group_id);

            CREATE TABLE IF NOT EXISTS contributions (
                id          TEXT PRIMARY KEY,
                person_id   TEXT NOT NULL,
                target_kind TEXT NOT NULL,
                target_id   TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_contributions_target
                ON contributions(target_kind, target_id);

            CREATE TABLE IF NOT EXISTS bounty_types (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS bounties (
                id             TEXT PRIMARY KEY,
                bounty_type_id TEXT REFERENCES bounty_types(id) ON DELETE SET NULL,
                target_kind    TEXT NOT NULL,
                target_id      TEXT NOT NULL,
                issuer         TEXT,
                claimer        TEXT,
                reward_cents   INTEGER NOT NULL DEFAULT 0,
                active         INTEGER NOT NULL DEFAULT 1,
                date_expire    TEXT,
                date_completed TEXT,
                created_at     TEXT NOT NULL,
                updated_at     TEXT NOT NULL,
                CHECK ((claimer IS NULL) = (date_completed IS NULL))
            );

            CREATE TABLE IF NOT EXISTS proposals (
                id                     TEXT PRIMARY KEY,
                target_kind            TEXT NOT NULL,
                target_id              TEXT NOT NULL,
                author                 TEXT,
                message                TEXT NOT NULL,
                suggested_reward_cents INTEGER NOT NULL DEFAULT 0,
                bounty_id              TEXT REFERENCES bounties(id),
                created_at             TEXT NOT NULL,
                updated_at             TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

// ---- row helpers ----

fn conversion_err(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_err(idx, format!("bad uuid {raw}: {e}")))
}

fn opt_uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| Uuid::parse_str(&s).map_err(|e| conversion_err(idx, format!("bad uuid {s}: {e}"))))
        .transpose()
}

fn ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, format!("bad timestamp {raw}: {e}")))
}

fn opt_ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_err(idx, format!("bad timestamp {s}: {e}")))
    })
    .transpose()
}

fn kind_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityKind> {
    let raw: String = row.get(idx)?;
    EntityKind::parse(&raw).ok_or_else(|| conversion_err(idx, format!("unknown entity kind {raw}")))
}

fn status_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<ListStatus> {
    let raw: String = row.get(idx)?;
    ListStatus::parse(&raw).ok_or_else(|| conversion_err(idx, format!("unknown list status {raw}")))
}

fn row_to_topic(row: &Row<'_>) -> rusqlite::Result<TopicNode> {
    Ok(TopicNode {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: ts_col(row, 3)?,
        updated_at: ts_col(row, 4)?,
    })
}

fn row_to_edge(row: &Row<'_>) -> rusqlite::Result<TopicEdge> {
    Ok(TopicEdge {
        parent_id: uuid_col(row, 0)?,
        child_id: uuid_col(row, 1)?,
        description: row.get(2)?,
        created_at: ts_col(row, 3)?,
    })
}

fn row_to_list(row: &Row<'_>) -> rusqlite::Result<List> {
    Ok(List {
        id: uuid_col(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        topic_id: opt_uuid_col(row, 3)?,
        active: row.get(4)?,
        status: status_col(row, 5)?,
        creator: opt_uuid_col(row, 6)?,
        lock_user: opt_uuid_col(row, 7)?,
        parent_list: opt_uuid_col(row, 8)?,
        version: row.get(9)?,
        created_at: ts_col(row, 10)?,
        updated_at: ts_col(row, 11)?,
    })
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<ListItem> {
    Ok(ListItem {
        id: uuid_col(row, 0)?,
        list_id: uuid_col(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        deep_dive: row.get(4)?,
        active: row.get(5)?,
        position: row.get(6)?,
        created_at: ts_col(row, 7)?,
        updated_at: ts_col(row, 8)?,
    })
}

fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<ListComment> {
    Ok(ListComment {
        id: uuid_col(row, 0)?,
        list_id: uuid_col(row, 1)?,
        author: opt_uuid_col(row, 2)?,
        message: row.get(3)?,
        created_at: ts_col(row, 4)?,
        updated_at: ts_col(row, 5)?,
    })
}

fn row_to_person(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: uuid_col(row, 0)?,
        degrees: row.get(1)?,
        job_title: row.get(2)?,
        personal_description: row.get(3)?,
        created_at: ts_col(row, 4)?,
        updated_at: ts_col(row, 5)?,
    })
}

fn row_to_group(row: &Row<'_>) -> rusqlite::Result<SubscriberGroup> {
    Ok(SubscriberGroup {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        created_at: ts_col(row, 2)?,
        updated_at: ts_col(row, 3)?,
    })
}

fn row_to_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: uuid_col(row, 0)?,
        group_id: uuid_col(row, 1)?,
        topic_id: uuid_col(row, 2)?,
        active: row.get(3)?,
        edit_power: row.get(4)?,
        price_cents: row.get(5)?,
        date_expire: opt_ts_col(row, 6)?,
        created_at: ts_col(row, 7)?,
        updated_at: ts_col(row, 8)?,
    })
}

fn row_to_bounty(row: &Row<'_>) -> rusqlite::Result<Bounty> {
    Ok(Bounty {
        id: uuid_col(row, 0)?,
        bounty_type_id: opt_uuid_col(row, 1)?,
        target: TargetRef::new(kind_col(row, 2)?, uuid_col(row, 3)?),
        issuer: opt_uuid_col(row, 4)?,
        claimer: opt_uuid_col(row, 5)?,
        reward_cents: row.get(6)?,
        active: row.get(7)?,
        date_expire: opt_ts_col(row, 8)?,
        date_completed: opt_ts_col(row, 9)?,
        created_at: ts_col(row, 10)?,
        updated_at: ts_col(row, 11)?,
    })
}

fn row_to_proposal(row: &Row<'_>) -> rusqlite::Result<Proposal> {
    Ok(Proposal {
        id: uuid_col(row, 0)?,
        target: TargetRef::new(kind_col(row, 1)?, uuid_col(row, 2)?),
        author: opt_uuid_col(row, 3)?,
        message: row.get(4)?,
        suggested_reward_cents: row.get(5)?,
        bounty_id: opt_uuid_col(row, 6)?,
        created_at: ts_col(row, 7)?,
        updated_at: ts_col(row, 8)?,
    })
}

fn row_to_contribution(row: &Row<'_>) -> rusqlite::Result<Contribution> {
    Ok(Contribution {
        id: uuid_col(row, 0)?,
        person_id: uuid_col(row, 1)?,
        target: TargetRef::new(kind_col(row, 2)?, uuid_col(row, 3)?),
        created_at: ts_col(row, 4)?,
    })
}

fn row_to_bounty_type(row: &Row<'_>) -> rusqlite::Result<BountyType> {
    Ok(BountyType {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: ts_col(row, 3)?,
    })
}

fn row_to_favorite(row: &Row<'_>) -> rusqlite::Result<FavoriteList> {
    Ok(FavoriteList {
        person_id: uuid_col(row, 0)?,
        list_id: uuid_col(row, 1)?,
        created_at: ts_col(row, 2)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn quoted_id_list(ids: &[Uuid]) -> String {
    // Ids come from internal traversals, never from raw request text.
    ids.iter()
        .map(|id| format!("'{id}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl CurationStore for SqliteStore {
    // ---- topics ----

    async fn create_topic(
        &self,
        name: String,
        description: String,
    ) -> Result<TopicNode, StorageError> {
        let topic = TopicNode::new(name, description);
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO topics (id, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                topic.id.to_string(),
                topic.name,
                topic.description,
                topic.created_at.to_rfc3339(),
                topic.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(topic)
    }

    async fn get_topic(&self, id: Uuid) -> Result<Option<TopicNode>, StorageError> {
        let conn = self.conn.lock().await;
        let topic = conn
            .query_row(
                "SELECT id, name, description, created_at, updated_at FROM topics WHERE id = ?1",
                params![id.to_string()],
                row_to_topic,
            )
            .optional()?;
        Ok(topic)
    }

    async fn topics_by_name(&self, name_substring: &str) -> Result<Vec<TopicNode>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, created_at, updated_at FROM topics
             WHERE name LIKE '%' || ?1 || '%' ORDER BY name ASC",
        )?;
        let topics = stmt
            .query_map(params![name_substring], row_to_topic)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(topics)
    }

    async fn delete_topic(&self, id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute("DELETE FROM topics WHERE id = ?1", params![id.to_string()])?;
        if rows == 0 {
            return Err(StorageError::not_found("topic", id));
        }
        Ok(())
    }

    async fn create_topic_edge(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
        description: String,
    ) -> Result<TopicEdge, StorageError> {
        let edge = TopicEdge::new(parent_id, child_id, description);
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO topic_edges (parent_id, child_id, description, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                edge.parent_id.to_string(),
                edge.child_id.to_string(),
                edge.description,
                edge.created_at.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(edge),
            Err(e) if is_constraint_violation(&e) => Err(StorageError::conflict(
                "topic_edge",
                format!("{parent_id}->{child_id}"),
                "edge already exists or endpoint missing",
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn topic_edges(&self) -> Result<Vec<TopicEdge>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT parent_id, child_id, description, created_at FROM topic_edges")?;
        let edges = stmt
            .query_map(params![], row_to_edge)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edges)
    }

    // ---- lists ----

    async fn create_list(
        &self,
        title: String,
        description: String,
        topic_id: Option<Uuid>,
        creator: Option<Uuid>,
    ) -> Result<List, StorageError> {
        let list = List::new(title, description, topic_id, creator);
        let conn = self.conn.lock().await;
        conn.execute(
            &format!("INSERT INTO lists ({LIST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                list.id.to_string(),
                list.title,
                list.description,
                list.topic_id.map(|id| id.to_string()),
                list.active,
                list.status.as_str(),
                list.creator.map(|id| id.to_string()),
                list.lock_user.map(|id| id.to_string()),
                list.parent_list.map(|id| id.to_string()),
                list.version,
                list.created_at.to_rfc3339(),
                list.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(list)
    }

    async fn get_list(&self, id: Uuid) -> Result<Option<List>, StorageError> {
        let conn = self.conn.lock().await;
        let list = conn
            .query_row(
                &format!("SELECT {LIST_COLUMNS} FROM lists WHERE id = ?1"),
                params![id.to_string()],
                row_to_list,
            )
            .optional()?;
        Ok(list)
    }

    async fn update_list_content(
        &self,
        id: Uuid,
        title: String,
        description: String,
        topic_id: Option<Uuid>,
    ) -> Result<List, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE lists SET title = ?2, description = ?3, topic_id = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                id.to_string(),
                title,
                description,
                topic_id.map(|t| t.to_string()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::not_found("list", id));
        }
        conn.query_row(
            &format!("SELECT {LIST_COLUMNS} FROM lists WHERE id = ?1"),
            params![id.to_string()],
            row_to_list,
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("list", id))
    }

    async fn set_list_active(&self, id: Uuid, active: bool) -> Result<List, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE lists SET active = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.to_string(), active, Utc::now().to_rfc3339()],
        )?;
        if rows == 0 {
            return Err(StorageError::not_found("list", id));
        }
        conn.query_row(
            &format!("SELECT {LIST_COLUMNS} FROM lists WHERE id = ?1"),
            params![id.to_string()],
            row_to_list,
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("list", id))
    }

    async fn delete_list(&self, id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let result = conn.execute("DELETE FROM lists WHERE id = ?1", params![id.to_string()]);
        match result {
            Ok(0) => Err(StorageError::not_found("list", id)),
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(StorageError::conflict(
                "list",
                id,
                "list has clones pointing at it",
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn try_submit_list(&self, id: Uuid) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE lists SET status = 'submitted', updated_at = ?2
             WHERE id = ?1 AND status = 'draft'",
            params![id.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(rows == 1)
    }

    async fn try_claim_list(&self, id: Uuid, editor: Uuid) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE lists SET lock_user = ?2, updated_at = ?3
             WHERE id = ?1 AND status = 'submitted' AND lock_user IS NULL",
            params![id.to_string(), editor.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(rows == 1)
    }

    async fn try_release_list(&self, id: Uuid, editor: Uuid) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE lists SET lock_user = NULL, updated_at = ?3
             WHERE id = ?1 AND status = 'submitted' AND lock_user = ?2",
            params![id.to_string(), editor.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(rows == 1)
    }

    async fn try_return_list_to_draft(&self, id: Uuid) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE lists SET status = 'draft', updated_at = ?2
             WHERE id = ?1 AND status = 'submitted' AND lock_user IS NULL",
            params![id.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(rows == 1)
    }

    async fn try_publish_list(&self, id: Uuid, editor: Uuid) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE lists SET status = 'published', lock_user = NULL, updated_at = ?3
             WHERE id = ?1 AND status = 'submitted' AND lock_user = ?2",
            params![id.to_string(), editor.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(rows == 1)
    }

    async fn clone_list(
        &self,
        source_id: Uuid,
        creator: Option<Uuid>,
    ) -> Result<List, StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let source = tx
            .query_row(
                &format!("SELECT {LIST_COLUMNS} FROM lists WHERE id = ?1"),
                params![source_id.to_string()],
                row_to_list,
            )
            .optional()?
            .ok_or_else(|| StorageError::not_found("list", source_id))?;

        let mut clone = List::new(
            source.title.clone(),
            source.description.clone(),
            source.topic_id,
            creator,
        );
        clone.parent_list = Some(source.id);
        clone.version = source.version + 1;

        tx.execute(
            &format!("INSERT INTO lists ({LIST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                clone.id.to_string(),
                clone.title,
                clone.description,
                clone.topic_id.map(|id| id.to_string()),
                clone.active,
                clone.status.as_str(),
                clone.creator.map(|id| id.to_string()),
                clone.lock_user.map(|id| id.to_string()),
                clone.parent_list.map(|id| id.to_string()),
                clone.version,
                clone.created_at.to_rfc3339(),
                clone.updated_at.to_rfc3339(),
            ],
        )?;

        {
            let mut stmt = tx.prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM list_items WHERE list_id = ?1 ORDER BY position ASC"
            ))?;
            let items = stmt
                .query_map(params![source_id.to_string()], row_to_item)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            let now = Utc::now().to_rfc3339();
            for item in items {
                tx.execute(
                    &format!("INSERT INTO list_items ({ITEM_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
                    params![
                        Uuid::new_v4().to_string(),
                        clone.id.to_string(),
                        item.title,
                        item.description,
                        item.deep_dive,
                        item.active,
                        item.position,
                        now,
                        now,
                    ],
                )?;
            }
        }

        tx.commit()?;
        Ok(clone)
    }

    async fn search_published_lists(
        &self,
        title_substring: Option<&str>,
        topic_ids: Option<&[Uuid]>,
        limit: u32,
    ) -> Result<Vec<List>, StorageError> {
        if let Some(ids) = topic_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
        }

        let mut sql =
            format!("SELECT {LIST_COLUMNS} FROM lists WHERE status = 'published' AND active = 1");
        if title_substring.is_some() {
            sql.push_str(" AND title LIKE '%' || ?1 || '%'");
        }
        if let Some(ids) = topic_ids {
            sql.push_str(&format!(" AND topic_id IN ({})", quoted_id_list(ids)));
        }
        sql.push_str(&format!(" ORDER BY created_at DESC, rowid DESC LIMIT {limit}"));

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let lists = match title_substring {
            Some(substring) => stmt
                .query_map(params![substring], row_to_list)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map(params![], row_to_list)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(lists)
    }

    // ---- list items ----

    async fn create_item(
        &self,
        list_id: Uuid,
        title: String,
        description: String,
        deep_dive: String,
    ) -> Result<ListItem, StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let list_exists = tx
            .query_row(
                "SELECT 1 FROM lists WHERE id = ?1",
                params![list_id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !list_exists {
            return Err(StorageError::not_found("list", list_id));
        }

        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM list_items WHERE list_id = ?1",
            params![list_id.to_string()],
            |row| row.get(0),
        )?;

        let item = ListItem::new(list_id, title, description, deep_dive, position);
        tx.execute(
            &format!("INSERT INTO list_items ({ITEM_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                item.id.to_string(),
                item.list_id.to_string(),
                item.title,
                item.description,
                item.deep_dive,
                item.active,
                item.position,
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(item)
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<ListItem>, StorageError> {
        let conn = self.conn.lock().await;
        let item = conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM list_items WHERE id = ?1"),
                params![id.to_string()],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    async fn update_item(
        &self,
        id: Uuid,
        title: String,
        description: String,
        deep_dive: String,
        active: bool,
    ) -> Result<ListItem, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE list_items SET title = ?2, description = ?3, deep_dive = ?4, active = ?5,
             updated_at = ?6 WHERE id = ?1",
            params![
                id.to_string(),
                title,
                description,
                deep_dive,
                active,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::not_found("list_item", id));
        }
        conn.query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM list_items WHERE id = ?1"),
            params![id.to_string()],
            row_to_item,
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("list_item", id))
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "DELETE FROM list_items WHERE id = ?1",
            params![id.to_string()],
        )?;
        if rows == 0 {
            return Err(StorageError::not_found("list_item", id));
        }
        Ok(())
    }

    async fn list_items(&self, list_id: Uuid) -> Result<Vec<ListItem>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM list_items WHERE list_id = ?1 ORDER BY position ASC"
        ))?;
        let items = stmt
            .query_map(params![list_id.to_string()], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    async fn reorder_items(&self, list_id: Uuid, ordered_ids: &[Uuid]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for (position, item_id) in ordered_ids.iter().enumerate() {
            let rows = tx.execute(
                "UPDATE list_items SET position = ?3, updated_at = ?4
                 WHERE id = ?1 AND list_id = ?2",
                params![
                    item_id.to_string(),
                    list_id.to_string(),
                    position as i64,
                    now,
                ],
            )?;
            if rows == 0 {
                return Err(StorageError::not_found("list_item", item_id));
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ---- comments ----

    async fn add_comment(
        &self,
        list_id: Uuid,
        author: Option<Uuid>,
        message: String,
    ) -> Result<ListComment, StorageError> {
        let comment = ListComment::new(list_id, author, message);
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO list_comments (id, list_id, author, message, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                comment.id.to_string(),
                comment.list_id.to_string(),
                comment.author.map(|id| id.to_string()),
                comment.message,
                comment.created_at.to_rfc3339(),
                comment.updated_at.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(comment),
            Err(e) if is_constraint_violation(&e) => {
                Err(StorageError::not_found("list", list_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_comments(&self, list_id: Uuid) -> Result<Vec<ListComment>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, list_id, author, message, created_at, updated_at FROM list_comments
             WHERE list_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )?;
        let comments = stmt
            .query_map(params![list_id.to_string()], row_to_comment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(comments)
    }

    // ---- people, groups, favourites ----

    async fn upsert_person(
        &self,
        id: Uuid,
        degrees: String,
        job_title: String,
        personal_description: String,
    ) -> Result<Person, StorageError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO persons (id, degrees, job_title, personal_description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 degrees = excluded.degrees,
                 job_title = excluded.job_title,
                 personal_description = excluded.personal_description,
                 updated_at = excluded.updated_at",
            params![id.to_string(), degrees, job_title, personal_description, now],
        )?;
        conn.query_row(
            "SELECT id, degrees, job_title, personal_description, created_at, updated_at
             FROM persons WHERE id = ?1",
            params![id.to_string()],
            row_to_person,
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("person", id))
    }

    async fn get_person(&self, id: Uuid) -> Result<Option<Person>, StorageError> {
        let conn = self.conn.lock().await;
        let person = conn
            .query_row(
                "SELECT id, degrees, job_title, personal_description, created_at, updated_at
                 FROM persons WHERE id = ?1",
                params![id.to_string()],
                row_to_person,
            )
            .optional()?;
        Ok(person)
    }

    async fn add_friend(&self, person_id: Uuid, friend_id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let result: rusqlite::Result<()> = (|| {
            conn.execute(
                "INSERT OR IGNORE INTO person_friends (person_id, friend_id) VALUES (?1, ?2)",
                params![person_id.to_string(), friend_id.to_string()],
            )?;
            conn.execute(
                "INSERT OR IGNORE INTO person_friends (person_id, friend_id) VALUES (?1, ?2)",
                params![friend_id.to_string(), person_id.to_string()],
            )?;
            Ok(())
        })();
        match result {
            Ok(()) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(StorageError::conflict(
                "person",
                person_id,
                "both people must exist",
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn friends_of(&self, person_id: Uuid) -> Result<Vec<Uuid>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT friend_id FROM person_friends WHERE person_id = ?1")?;
        let friends = stmt
            .query_map(params![person_id.to_string()], |row| uuid_col(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(friends)
    }

    async fn add_favorite(
        &self,
        person_id: Uuid,
        list_id: Uuid,
    ) -> Result<FavoriteList, StorageError> {
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT OR IGNORE INTO favorite_lists (person_id, list_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![
                person_id.to_string(),
                list_id.to_string(),
                Utc::now().to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(StorageError::conflict(
                    "favorite_list",
                    list_id,
                    "person and list must exist",
                ));
            }
            Err(e) => return Err(e.into()),
        }
        conn.query_row(
            "SELECT person_id, list_id, created_at FROM favorite_lists
             WHERE person_id = ?1 AND list_id = ?2",
            params![person_id.to_string(), list_id.to_string()],
            row_to_favorite,
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("favorite_list", list_id))
    }

    async fn remove_favorite(&self, person_id: Uuid, list_id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "DELETE FROM favorite_lists WHERE person_id = ?1 AND list_id = ?2",
            params![person_id.to_string(), list_id.to_string()],
        )?;
        if rows == 0 {
            return Err(StorageError::not_found("favorite_list", list_id));
        }
        Ok(())
    }

    async fn favorites_of(&self, person_id: Uuid) -> Result<Vec<FavoriteList>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT person_id, list_id, created_at FROM favorite_lists
             WHERE person_id = ?1 ORDER BY created_at DESC",
        )?;
        let favorites = stmt
            .query_map(params![person_id.to_string()], row_to_favorite)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(favorites)
    }

    async fn create_group(&self, name: String) -> Result<SubscriberGroup, StorageError> {
        let group = SubscriberGroup::new(name);
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO subscriber_groups (id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                group.id.to_string(),
                group.name,
                group.created_at.to_rfc3339(),
                group.updated_at.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(group),
            Err(e) if is_constraint_violation(&e) => Err(StorageError::conflict(
                "subscriber_group",
                &group.name,
                "group name already exists",
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_group(&self, id: Uuid) -> Result<Option<SubscriberGroup>, StorageError> {
        let conn = self.conn.lock().await;
        let group = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM subscriber_groups WHERE id = ?1",
                params![id.to_string()],
                row_to_group,
            )
            .optional()?;
        Ok(group)
    }

    async fn add_group_member(
        &self,
        person_id: Uuid,
        group_id: Uuid,
    ) -> Result<GroupMember, StorageError> {
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT OR IGNORE INTO group_members (person_id, group_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![
                person_id.to_string(),
                group_id.to_string(),
                Utc::now().to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(StorageError::conflict(
                    "group_member",
                    person_id,
                    "person and group must exist",
                ));
            }
            Err(e) => return Err(e.into()),
        }
        conn.query_row(
            "SELECT person_id, group_id, created_at FROM group_members
             WHERE person_id = ?1 AND group_id = ?2",
            params![person_id.to_string(), group_id.to_string()],
            |row| {
                Ok(GroupMember {
                    person_id: uuid_col(row, 0)?,
                    group_id: uuid_col(row, 1)?,
                    created_at: ts_col(row, 2)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("group_member", person_id))
    }

    async fn groups_of_person(&self, person_id: Uuid) -> Result<Vec<Uuid>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT group_id FROM group_members WHERE person_id = ?1")?;
        let groups = stmt
            .query_map(params![person_id.to_string()], |row| uuid_col(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(groups)
    }

    // ---- subscriptions ----

    async fn create_subscription(
        &self,
        group_id: Uuid,
        topic_id: Uuid,
        edit_power: bool,
        price_cents: i64,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Subscription, StorageError> {
        let subscription = Subscription::new(group_id, topic_id, edit_power, price_cents, date_expire);
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO subscriptions (id, group_id, topic_id, active, edit_power, price_cents,
                                        date_expire, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                subscription.id.to_string(),
                subscription.group_id.to_string(),
                subscription.topic_id.to_string(),
                subscription.active,
                subscription.edit_power,
                subscription.price_cents,
                subscription.date_expire.map(|d| d.to_rfc3339()),
                subscription.created_at.to_rfc3339(),
                subscription.updated_at.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(subscription),
            Err(e) if is_constraint_violation(&e) => Err(StorageError::conflict(
                "subscription",
                subscription.id,
                "group and topic must exist",
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn subscriptions_for_groups(
        &self,
        group_ids: &[Uuid],
    ) -> Result<Vec<Subscription>, StorageError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, group_id, topic_id, active, edit_power, price_cents, date_expire,
                    created_at, updated_at
             FROM subscriptions WHERE group_id IN ({})",
            quoted_id_list(group_ids)
        );
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let subscriptions = stmt
            .query_map(params![], row_to_subscription)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(subscriptions)
    }

    // ---- review workflow ----

    async fn create_bounty_type(
        &self,
        name: String,
        description: String,
    ) -> Result<BountyType, StorageError> {
        let bounty_type = BountyType::new(name, description);
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO bounty_types (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                bounty_type.id.to_string(),
                bounty_type.name,
                bounty_type.description,
                bounty_type.created_at.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(bounty_type),
            Err(e) if is_constraint_violation(&e) => Err(StorageError::conflict(
                "bounty_type",
                &bounty_type.name,
                "bounty type name already exists",
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_bounty(
        &self,
        target: TargetRef,
        issuer: Option<Uuid>,
        reward_cents: i64,
        bounty_type_id: Option<Uuid>,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Bounty, StorageError> {
        let bounty = Bounty::new(target, issuer, reward_cents, bounty_type_id, date_expire);
        let conn = self.conn.lock().await;
        conn.execute(
            &format!("INSERT INTO bounties ({BOUNTY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                bounty.id.to_string(),
                bounty.bounty_type_id.map(|id| id.to_string()),
                bounty.target.kind.as_str(),
                bounty.target.id.to_string(),
                bounty.issuer.map(|id| id.to_string()),
                bounty.claimer.map(|id| id.to_string()),
                bounty.reward_cents,
                bounty.active,
                bounty.date_expire.map(|d| d.to_rfc3339()),
                bounty.date_completed.map(|d| d.to_rfc3339()),
                bounty.created_at.to_rfc3339(),
                bounty.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(bounty)
    }

    async fn get_bounty(&self, id: Uuid) -> Result<Option<Bounty>, StorageError> {
        let conn = self.conn.lock().await;
        let bounty = conn
            .query_row(
                &format!("SELECT {BOUNTY_COLUMNS} FROM bounties WHERE id = ?1"),
                params![id.to_string()],
                row_to_bounty,
            )
            .optional()?;
        Ok(bounty)
    }

    async fn try_claim_bounty(
        &self,
        id: Uuid,
        claimer: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let now_text = now.to_rfc3339();

        let rows = tx.execute(
            "UPDATE bounties SET claimer = ?2, date_completed = ?3, updated_at = ?3
             WHERE id = ?1 AND claimer IS NULL AND active = 1
               AND (date_expire IS NULL OR date_expire > ?3)",
            params![id.to_string(), claimer.to_string(), now_text],
        )?;

        if rows == 1 {
            // The claim and its ledger entry commit together or not at all.
            let (target_kind, target_id): (String, String) = tx.query_row(
                "SELECT target_kind, target_id FROM bounties WHERE id = ?1",
                params![id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            tx.execute(
                "INSERT INTO contributions (id, person_id, target_kind, target_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    Uuid::new_v4().to_string(),
                    claimer.to_string(),
                    target_kind,
                    target_id,
                    now_text,
                ],
            )?;
        }

        tx.commit()?;
        Ok(rows == 1)
    }

    async fn try_set_bounty_active(&self, id: Uuid, active: bool) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE bounties SET active = ?2, updated_at = ?3
             WHERE id = ?1 AND date_completed IS NULL",
            params![id.to_string(), active, Utc::now().to_rfc3339()],
        )?;
        Ok(rows == 1)
    }

    async fn create_proposal(
        &self,
        target: TargetRef,
        author: Option<Uuid>,
        message: String,
        suggested_reward_cents: i64,
    ) -> Result<Proposal, StorageError> {
        let proposal = Proposal::new(target, author, message, suggested_reward_cents);
        let conn = self.conn.lock().await;
        conn.execute(
            &format!("INSERT INTO proposals ({PROPOSAL_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                proposal.id.to_string(),
                proposal.target.kind.as_str(),
                proposal.target.id.to_string(),
                proposal.author.map(|id| id.to_string()),
                proposal.message,
                proposal.suggested_reward_cents,
                proposal.bounty_id.map(|id| id.to_string()),
                proposal.created_at.to_rfc3339(),
                proposal.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(proposal)
    }

    async fn get_proposal(&self, id: Uuid) -> Result<Option<Proposal>, StorageError> {
        let conn = self.conn.lock().await;
        let proposal = conn
            .query_row(
                &format!("SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE id = ?1"),
                params![id.to_string()],
                row_to_proposal,
            )
            .optional()?;
        Ok(proposal)
    }

    async fn open_proposals(&self) -> Result<Vec<Proposal>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE bounty_id IS NULL
             ORDER BY created_at ASC, rowid ASC"
        ))?;
        let proposals = stmt
            .query_map(params![], row_to_proposal)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(proposals)
    }

    async fn issue_bounty_for_proposal(
        &self,
        proposal_id: Uuid,
        issuer: Uuid,
        reward_cents: i64,
        bounty_type_id: Option<Uuid>,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Bounty, StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let proposal = tx
            .query_row(
                &format!("SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE id = ?1"),
                params![proposal_id.to_string()],
                row_to_proposal,
            )
            .optional()?
            .ok_or_else(|| StorageError::not_found("proposal", proposal_id))?;

        if proposal.bounty_id.is_some() {
            return Err(StorageError::conflict(
                "proposal",
                proposal_id,
                "proposal already fulfilled",
            ));
        }

        let bounty = Bounty::new(
            proposal.target,
            Some(issuer),
            reward_cents,
            bounty_type_id,
            date_expire,
        );
        tx.execute(
            &format!("INSERT INTO bounties ({BOUNTY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                bounty.id.to_string(),
                bounty.bounty_type_id.map(|id| id.to_string()),
                bounty.target.kind.as_str(),
                bounty.target.id.to_string(),
                bounty.issuer.map(|id| id.to_string()),
                bounty.claimer.map(|id| id.to_string()),
                bounty.reward_cents,
                bounty.active,
                bounty.date_expire.map(|d| d.to_rfc3339()),
                bounty.date_completed.map(|d| d.to_rfc3339()),
                bounty.created_at.to_rfc3339(),
                bounty.updated_at.to_rfc3339(),
            ],
        )?;

        let rows = tx.execute(
            "UPDATE proposals SET bounty_id = ?2, updated_at = ?3
             WHERE id = ?1 AND bounty_id IS NULL",
            params![
                proposal_id.to_string(),
                bounty.id.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        if rows != 1 {
            // Dropping the transaction rolls the bounty insert back.
            return Err(StorageError::conflict(
                "proposal",
                proposal_id,
                "proposal already fulfilled",
            ));
        }

        tx.commit()?;
        Ok(bounty)
    }

    // ---- contribution ledger ----

    async fn add_contribution(
        &self,
        person_id: Uuid,
        target: TargetRef,
    ) -> Result<Contribution, StorageError> {
        let contribution = Contribution::new(person_id, target);
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO contributions (id, person_id, target_kind, target_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                contribution.id.to_string(),
                contribution.person_id.to_string(),
                contribution.target.kind.as_str(),
                contribution.target.id.to_string(),
                contribution.created_at.to_rfc3339(),
            ],
        )?;
        Ok(contribution)
    }

    async fn contributions_for_target(
        &self,
        target: TargetRef,
    ) -> Result<Vec<Contribution>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, person_id, target_kind, target_id, created_at FROM contributions
             WHERE target_kind = ?1 AND target_id = ?2 ORDER BY created_at ASC, rowid ASC",
        )?;
        let contributions = stmt
            .query_map(
                params![target.kind.as_str(), target.id.to_string()],
                row_to_contribution,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(contributions)
    }
}
