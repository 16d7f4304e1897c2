use super::enums::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed reference to an arbitrary entity: a kind tag plus the row id.
///
/// Used wherever the schema needs a polymorphic pointer (contributions,
/// bounties, proposals). Resolution goes through the review service's
/// kind registry, not through an untyped foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub kind: EntityKind,
    pub id: Uuid,
}

impl TargetRef {
    pub fn new(kind: EntityKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    pub fn list(id: Uuid) -> Self {
        Self::new(EntityKind::List, id)
    }

    pub fn list_item(id: Uuid) -> Self {
        Self::new(EntityKind::ListItem, id)
    }

    pub fn topic(id: Uuid) -> Self {
        Self::new(EntityKind::Topic, id)
    }
}

/// Append-only ledger row recording that a person contributed to a target.
/// Never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub person_id: Uuid,
    pub target: TargetRef,
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    pub fn new(person_id: Uuid, target: TargetRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            target,
            created_at: Utc::now(),
        }
    }
}
