use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grants a subscriber group access to a topic and, through the topic graph,
/// every descendant of that topic.
///
/// `edit_power` upgrades the grant to editorial rights (claiming, publishing,
/// issuing bounties). `price_cents` is recorded for the books, never charged
/// here. Expiration is evaluated at query time: a subscription past
/// `date_expire` is dead no matter what `active` says on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub group_id: Uuid,
    pub topic_id: Uuid,
    pub active: bool,
    pub edit_power: bool,
    pub price_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        group_id: Uuid,
        topic_id: Uuid,
        edit_power: bool,
        price_cents: i64,
        date_expire: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            group_id,
            topic_id,
            active: true,
            edit_power,
            price_cents,
            date_expire,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the subscription confers any rights at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && self.date_expire.map_or(true, |exp| exp > now)
    }
}
