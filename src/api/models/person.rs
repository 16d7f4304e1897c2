use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile, one-to-one with the opaque identity supplied by the
/// external auth collaborator (the person id *is* that identity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    #[serde(default)]
    pub degrees: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub personal_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            degrees: String::new(),
            job_title: String::new(),
            personal_description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A named group of subscribers. Singleton groups model individual
/// subscribers; larger groups model organisations buying bulk access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberGroup {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriberGroup {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Join row marking a list as a favourite of a person. Carries its own
/// creation timestamp and dies with either side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteList {
    pub person_id: Uuid,
    pub list_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Join row placing a person in a subscriber group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub person_id: Uuid,
    pub group_id: Uuid,
    pub created_at: DateTime<Utc>,
}
