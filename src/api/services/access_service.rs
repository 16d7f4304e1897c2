//! Subscription-based access resolution.
//!
//! An actor's rights on a topic come from the subscriptions held by the
//! groups they belong to. A subscription on topic T covers T and every
//! descendant of T. Expiration is computed at query time — a row past its
//! `date_expire` grants nothing regardless of the stored `active` flag.

use crate::graph;
use crate::storage::CurationStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::error::CurationError;

#[derive(Clone)]
pub struct AccessService {
    store: Arc<dyn CurationStore>,
}

impl AccessService {
    pub fn new(store: Arc<dyn CurationStore>) -> Self {
        Self { store }
    }

    /// Any live subscription covering the topic.
    pub async fn can_view_topic(&self, actor: Uuid, topic_id: Uuid) -> Result<bool, CurationError> {
        self.has_access(actor, topic_id, false).await
    }

    /// A live subscription with edit power covering the topic. This is what
    /// makes an actor an editor for the topic's scope.
    pub async fn can_edit_topic(&self, actor: Uuid, topic_id: Uuid) -> Result<bool, CurationError> {
        self.has_access(actor, topic_id, true).await
    }

    async fn has_access(
        &self,
        actor: Uuid,
        topic_id: Uuid,
        require_edit: bool,
    ) -> Result<bool, CurationError> {
        let groups = self.store.groups_of_person(actor).await?;
        if groups.is_empty() {
            return Ok(false);
        }

        let now = Utc::now();
        let live: Vec<_> = self
            .store
            .subscriptions_for_groups(&groups)
            .await?
            .into_iter()
            .filter(|sub| sub.is_live(now) && (!require_edit || sub.edit_power))
            .collect();
        if live.is_empty() {
            return Ok(false);
        }

        // Direct grant first; only load the edge snapshot for the
        // descendant check when needed.
        if live.iter().any(|sub| sub.topic_id == topic_id) {
            return Ok(true);
        }
        let edges = self.store.topic_edges().await?;
        Ok(live
            .iter()
            .any(|sub| graph::is_ancestor_of(&edges, sub.topic_id, topic_id)))
    }
}
