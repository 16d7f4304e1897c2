use serde::{Deserialize, Serialize};
use std::fmt;

/// Editorial status of a list.
///
/// Lists start as drafts, are submitted for review, and end up published.
/// Published is terminal for a row: changing published content means cloning
/// the list into a new draft row with a bumped version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Draft,
    Submitted,
    Published,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListStatus::Draft => "draft",
            ListStatus::Submitted => "submitted",
            ListStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ListStatus::Draft),
            "submitted" => Some(ListStatus::Submitted),
            "published" => Some(ListStatus::Published),
            _ => None,
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind tag for generic target references (contributions, bounties, proposals).
///
/// The database keeps the string form, so rows written before a new kind was
/// added keep resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    List,
    ListItem,
    Topic,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::List => "list",
            EntityKind::ListItem => "list_item",
            EntityKind::Topic => "topic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "list" => Some(EntityKind::List),
            "list_item" => Some(EntityKind::ListItem),
            "topic" => Some(EntityKind::Topic),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
