use super::target::TargetRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lookup row classifying bounties (e.g. "new list", "fact check").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BountyType {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl BountyType {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: Utc::now(),
        }
    }
}

/// A reward offered for work on a target entity.
///
/// `issuer` is null for system-issued bounties. `claimer` and
/// `date_completed` are set together, exactly once, when the bounty is
/// claimed — one is non-null iff the other is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bounty {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounty_type_id: Option<Uuid>,
    pub target: TargetRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimer: Option<Uuid>,
    pub reward_cents: i64,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_expire: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bounty {
    pub fn new(
        target: TargetRef,
        issuer: Option<Uuid>,
        reward_cents: i64,
        bounty_type_id: Option<Uuid>,
        date_expire: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            bounty_type_id,
            target,
            issuer,
            claimer: None,
            reward_cents,
            active: true,
            date_expire,
            date_completed: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimer.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.date_expire.map_or(false, |exp| exp <= now)
    }
}

/// A request for a bounty to be issued against a target.
///
/// `bounty_id` starts null and is set once when an editor fulfils the
/// proposal; fulfilment is one-way and never cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: Uuid,
    pub target: TargetRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Uuid>,
    pub message: String,
    pub suggested_reward_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounty_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    pub fn new(target: TargetRef, author: Option<Uuid>, message: String, suggested_reward_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            target,
            author,
            message,
            suggested_reward_cents,
            bounty_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.bounty_id.is_some()
    }
}
