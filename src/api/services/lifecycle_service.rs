//! List lifecycle service.
//!
//! The editorial state machine: Draft → Submitted → Published, with the
//! review lock on submitted lists and per-state visibility rules. Guards are
//! checked against a fresh read for precise error reporting, but the store's
//! conditional update is the arbiter — two competing claims race on the
//! database and exactly one wins.

use crate::models::{FavoriteList, List, ListComment, ListItem, ListStatus};
use crate::services::search_projection::{self, IndexSink};
use crate::storage::CurationStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::access_service::AccessService;
use super::error::CurationError;

#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn CurationStore>,
    access: AccessService,
    index: Arc<dyn IndexSink>,
}

impl LifecycleService {
    pub fn new(
        store: Arc<dyn CurationStore>,
        access: AccessService,
        index: Arc<dyn IndexSink>,
    ) -> Self {
        Self { store, access, index }
    }

    // ---- reads ----

    async fn load(&self, id: Uuid) -> Result<List, CurationError> {
        self.store
            .get_list(id)
            .await?
            .ok_or_else(|| CurationError::not_found("list", id))
    }

    /// Per-state read visibility: drafts are the creator's alone, submitted
    /// lists open up to editors on the topic, published+active lists are
    /// readable by anyone (inactive ones fall back to the creator).
    async fn can_read(&self, actor: Option<Uuid>, list: &List) -> Result<bool, CurationError> {
        match list.status {
            ListStatus::Draft => Ok(actor.is_some_and(|a| list.is_creator(a))),
            ListStatus::Submitted => {
                let Some(actor) = actor else { return Ok(false) };
                if list.is_creator(actor) {
                    return Ok(true);
                }
                match list.topic_id {
                    Some(topic) => self.access.can_edit_topic(actor, topic).await,
                    None => Ok(false),
                }
            }
            ListStatus::Published => {
                if list.active {
                    Ok(true)
                } else {
                    Ok(actor.is_some_and(|a| list.is_creator(a)))
                }
            }
        }
    }

    pub async fn get_list(&self, actor: Option<Uuid>, id: Uuid) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if !self.can_read(actor, &list).await? {
            // Hide the row's existence from actors who cannot see it.
            return Err(CurationError::not_found("list", id));
        }
        Ok(list)
    }

    pub async fn items(&self, actor: Option<Uuid>, list_id: Uuid) -> Result<Vec<ListItem>, CurationError> {
        self.get_list(actor, list_id).await?;
        Ok(self.store.list_items(list_id).await?)
    }

    pub async fn comments(
        &self,
        actor: Option<Uuid>,
        list_id: Uuid,
    ) -> Result<Vec<ListComment>, CurationError> {
        self.get_list(actor, list_id).await?;
        Ok(self.store.list_comments(list_id).await?)
    }

    // ---- content edits (Draft + creator only) ----

    fn ensure_editable(&self, actor: Uuid, list: &List) -> Result<(), CurationError> {
        // Content is only malleable while the creator is still drafting.
        // Reviewers transition state and comment; they never edit content.
        if !list.is_creator(actor) || list.status != ListStatus::Draft {
            return Err(CurationError::Forbidden);
        }
        Ok(())
    }

    pub async fn create_list(
        &self,
        actor: Uuid,
        title: String,
        description: String,
        topic_id: Option<Uuid>,
    ) -> Result<List, CurationError> {
        if title.trim().is_empty() {
            return Err(CurationError::validation("title", "title must not be empty"));
        }
        if let Some(topic) = topic_id {
            if self.store.get_topic(topic).await?.is_none() {
                return Err(CurationError::not_found("topic", topic));
            }
        }
        let list = self
            .store
            .create_list(title, description, topic_id, Some(actor))
            .await?;
        info!(list_id = %list.id, creator = %actor, "list created");
        self.index.apply(search_projection::upsert_list(&list));
        Ok(list)
    }

    pub async fn update_list(
        &self,
        actor: Uuid,
        id: Uuid,
        title: String,
        description: String,
        topic_id: Option<Uuid>,
    ) -> Result<List, CurationError> {
        if title.trim().is_empty() {
            return Err(CurationError::validation("title", "title must not be empty"));
        }
        let list = self.load(id).await?;
        self.ensure_editable(actor, &list)?;
        if let Some(topic) = topic_id {
            if self.store.get_topic(topic).await?.is_none() {
                return Err(CurationError::not_found("topic", topic));
            }
        }
        let updated = self
            .store
            .update_list_content(id, title, description, topic_id)
            .await?;
        self.index.apply(search_projection::upsert_list(&updated));
        Ok(updated)
    }

    pub async fn delete_list(&self, actor: Uuid, id: Uuid) -> Result<(), CurationError> {
        let list = self.load(id).await?;
        self.ensure_editable(actor, &list)?;
        self.store.delete_list(id).await?;
        info!(list_id = %id, "list deleted");
        self.index
            .apply(search_projection::remove(crate::models::EntityKind::List, id));
        Ok(())
    }

    pub async fn set_active(&self, actor: Uuid, id: Uuid, active: bool) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if !list.is_creator(actor) {
            return Err(CurationError::Forbidden);
        }
        let updated = self.store.set_list_active(id, active).await?;
        self.index.apply(search_projection::upsert_list(&updated));
        Ok(updated)
    }

    // ---- transitions ----

    /// Draft → Submitted. Creator only.
    pub async fn submit(&self, actor: Uuid, id: Uuid) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if !list.is_creator(actor) {
            return Err(CurationError::Forbidden);
        }
        if list.status != ListStatus::Draft {
            return Err(CurationError::InvalidTransition {
                from: list.status,
                event: "submit",
            });
        }
        if !self.store.try_submit_list(id).await? {
            return Err(CurationError::conflict("list changed state during submit"));
        }
        let submitted = self.load(id).await?;
        info!(list_id = %id, "list submitted for review");
        self.index.apply(search_projection::upsert_list(&submitted));
        Ok(submitted)
    }

    /// Take the review lock on a submitted list. Editor on the list's topic
    /// scope only; loses to a concurrent claim with `Conflict`.
    pub async fn claim(&self, actor: Uuid, id: Uuid) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if list.status != ListStatus::Submitted {
            return Err(CurationError::InvalidTransition {
                from: list.status,
                event: "claim",
            });
        }
        let Some(topic) = list.topic_id else {
            // No topic scope means no editor is authorized for it.
            return Err(CurationError::Forbidden);
        };
        if !self.access.can_edit_topic(actor, topic).await? {
            return Err(CurationError::Forbidden);
        }
        if !self.store.try_claim_list(id, actor).await? {
            return Err(CurationError::conflict(
                "another editor holds the review lock",
            ));
        }
        info!(list_id = %id, editor = %actor, "review lock claimed");
        self.load(id).await
    }

    /// Drop the review lock. Lock holder only.
    pub async fn release(&self, actor: Uuid, id: Uuid) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if list.status != ListStatus::Submitted {
            return Err(CurationError::InvalidTransition {
                from: list.status,
                event: "release",
            });
        }
        if !list.is_locked_by(actor) {
            return Err(CurationError::Forbidden);
        }
        if !self.store.try_release_list(id, actor).await? {
            return Err(CurationError::conflict("review lock changed during release"));
        }
        self.load(id).await
    }

    /// Submitted → Draft. Creator only, and only while no editor holds the
    /// lock.
    pub async fn return_to_draft(&self, actor: Uuid, id: Uuid) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if !list.is_creator(actor) {
            return Err(CurationError::Forbidden);
        }
        if list.status != ListStatus::Submitted {
            return Err(CurationError::InvalidTransition {
                from: list.status,
                event: "return-to-draft",
            });
        }
        if list.lock_user.is_some() {
            return Err(CurationError::conflict("list is locked for review"));
        }
        if !self.store.try_return_list_to_draft(id).await? {
            return Err(CurationError::conflict("list changed state during return"));
        }
        let drafted = self.load(id).await?;
        self.index.apply(search_projection::upsert_list(&drafted));
        Ok(drafted)
    }

    /// Submitted → Published. Lock holder only. The lock is cleared in the
    /// same update — published content no longer needs one.
    pub async fn publish(&self, actor: Uuid, id: Uuid) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if list.status != ListStatus::Submitted {
            return Err(CurationError::InvalidTransition {
                from: list.status,
                event: "publish",
            });
        }
        if !list.is_locked_by(actor) {
            return Err(CurationError::Forbidden);
        }
        if !self.store.try_publish_list(id, actor).await? {
            return Err(CurationError::conflict("list changed state during publish"));
        }
        let published = self.load(id).await?;
        info!(list_id = %id, editor = %actor, "list published");
        self.index.apply(search_projection::upsert_list(&published));
        Ok(published)
    }

    /// Copy a list into a fresh draft: `version` bumped, `parent_list` set,
    /// the caller as creator. Any actor who can read the source may clone it.
    pub async fn clone_list(&self, actor: Uuid, id: Uuid) -> Result<List, CurationError> {
        let list = self.load(id).await?;
        if !self.can_read(Some(actor), &list).await? {
            return Err(CurationError::Forbidden);
        }
        let clone = self.store.clone_list(id, Some(actor)).await?;
        info!(list_id = %id, clone_id = %clone.id, version = clone.version, "list cloned");
        self.index.apply(search_projection::upsert_list(&clone));
        Ok(clone)
    }

    // ---- items ----

    pub async fn add_item(
        &self,
        actor: Uuid,
        list_id: Uuid,
        title: String,
        description: String,
        deep_dive: String,
    ) -> Result<ListItem, CurationError> {
        if title.trim().is_empty() {
            return Err(CurationError::validation("title", "title must not be empty"));
        }
        let list = self.load(list_id).await?;
        self.ensure_editable(actor, &list)?;
        Ok(self
            .store
            .create_item(list_id, title, description, deep_dive)
            .await?)
    }

    pub async fn update_item(
        &self,
        actor: Uuid,
        item_id: Uuid,
        title: String,
        description: String,
        deep_dive: String,
        active: bool,
    ) -> Result<ListItem, CurationError> {
        let item = self
            .store
            .get_item(item_id)
            .await?
            .ok_or_else(|| CurationError::not_found("list_item", item_id))?;
        let list = self.load(item.list_id).await?;
        self.ensure_editable(actor, &list)?;
        Ok(self
            .store
            .update_item(item_id, title, description, deep_dive, active)
            .await?)
    }

    pub async fn delete_item(&self, actor: Uuid, item_id: Uuid) -> Result<(), CurationError> {
        let item = self
            .store
            .get_item(item_id)
            .await?
            .ok_or_else(|| CurationError::not_found("list_item", item_id))?;
        let list = self.load(item.list_id).await?;
        self.ensure_editable(actor, &list)?;
        Ok(self.store.delete_item(item_id).await?)
    }

    /// Rewrite the sibling order. `ordered_ids` must be exactly the list's
    /// current item set.
    pub async fn reorder_items(
        &self,
        actor: Uuid,
        list_id: Uuid,
        ordered_ids: Vec<Uuid>,
    ) -> Result<Vec<ListItem>, CurationError> {
        let list = self.load(list_id).await?;
        self.ensure_editable(actor, &list)?;

        let current: HashSet<Uuid> = self
            .store
            .list_items(list_id)
            .await?
            .into_iter()
            .map(|item| item.id)
            .collect();
        let requested: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        if requested.len() != ordered_ids.len() || requested != current {
            return Err(CurationError::validation(
                "items",
                "ordering must contain each item of the list exactly once",
            ));
        }

        self.store.reorder_items(list_id, &ordered_ids).await?;
        Ok(self.store.list_items(list_id).await?)
    }

    // ---- comments ----

    /// Append a comment. Drafts take comments from the creator; submitted
    /// lists also from editors on the topic; published lists from any
    /// authenticated reader.
    pub async fn add_comment(
        &self,
        actor: Uuid,
        list_id: Uuid,
        message: String,
    ) -> Result<ListComment, CurationError> {
        if message.trim().is_empty() {
            return Err(CurationError::validation("message", "message must not be empty"));
        }
        let list = self.load(list_id).await?;
        let allowed = match list.status {
            ListStatus::Draft => list.is_creator(actor),
            ListStatus::Submitted => {
                list.is_creator(actor)
                    || match list.topic_id {
                        Some(topic) => self.access.can_edit_topic(actor, topic).await?,
                        None => false,
                    }
            }
            ListStatus::Published => self.can_read(Some(actor), &list).await?,
        };
        if !allowed {
            return Err(CurationError::Forbidden);
        }
        Ok(self.store.add_comment(list_id, Some(actor), message).await?)
    }

    // ---- favourites ----

    pub async fn add_favorite(&self, actor: Uuid, list_id: Uuid) -> Result<FavoriteList, CurationError> {
        let list = self.load(list_id).await?;
        if !self.can_read(Some(actor), &list).await? {
            return Err(CurationError::not_found("list", list_id));
        }
        // The join row needs a profile row on the person side.
        if self.store.get_person(actor).await?.is_none() {
            self.store
                .upsert_person(actor, String::new(), String::new(), String::new())
                .await?;
        }
        Ok(self.store.add_favorite(actor, list_id).await?)
    }

    pub async fn remove_favorite(&self, actor: Uuid, list_id: Uuid) -> Result<(), CurationError> {
        Ok(self.store.remove_favorite(actor, list_id).await?)
    }

    pub async fn favorites(&self, actor: Uuid) -> Result<Vec<FavoriteList>, CurationError> {
        Ok(self.store.favorites_of(actor).await?)
    }
}
