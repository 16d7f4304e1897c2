//! Proposal and bounty workflow.
//!
//! Proposals ask for a bounty against a target entity; an editor authorized
//! on the target's topic scope may fulfil one by issuing a bounty, which
//! links the two atomically. Claims settle a bounty exactly once and append
//! the claimer's row to the contribution ledger in the same transaction.

use crate::models::{Bounty, BountyType, Contribution, EntityKind, Proposal, TargetRef};
use crate::storage::CurationStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::access_service::AccessService;
use super::error::CurationError;

/// A target reference resolved through the kind registry: confirmed to
/// exist, with the topic scope that governs editorial authority over it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTarget {
    pub target: TargetRef,
    pub topic_scope: Option<Uuid>,
}

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn CurationStore>,
    access: AccessService,
}

impl ReviewService {
    pub fn new(store: Arc<dyn CurationStore>, access: AccessService) -> Self {
        Self { store, access }
    }

    /// Resolve a target reference: load the row behind the kind tag and
    /// derive its topic scope. One arm per registered kind.
    pub async fn resolve_target(&self, target: TargetRef) -> Result<ResolvedTarget, CurationError> {
        let topic_scope = match target.kind {
            EntityKind::List => {
                let list = self
                    .store
                    .get_list(target.id)
                    .await?
                    .ok_or_else(|| CurationError::not_found("list", target.id))?;
                list.topic_id
            }
            EntityKind::ListItem => {
                let item = self
                    .store
                    .get_item(target.id)
                    .await?
                    .ok_or_else(|| CurationError::not_found("list_item", target.id))?;
                let list = self
                    .store
                    .get_list(item.list_id)
                    .await?
                    .ok_or_else(|| CurationError::not_found("list", item.list_id))?;
                list.topic_id
            }
            EntityKind::Topic => {
                self.store
                    .get_topic(target.id)
                    .await?
                    .ok_or_else(|| CurationError::not_found("topic", target.id))?;
                Some(target.id)
            }
        };
        Ok(ResolvedTarget { target, topic_scope })
    }

    // ---- proposals ----

    pub async fn create_proposal(
        &self,
        actor: Uuid,
        target: TargetRef,
        message: String,
        suggested_reward_cents: i64,
    ) -> Result<Proposal, CurationError> {
        if message.trim().is_empty() {
            return Err(CurationError::validation("message", "message must not be empty"));
        }
        if suggested_reward_cents < 0 {
            return Err(CurationError::validation(
                "suggested_reward_cents",
                "reward must not be negative",
            ));
        }
        self.resolve_target(target).await?;
        Ok(self
            .store
            .create_proposal(target, Some(actor), message, suggested_reward_cents)
            .await?)
    }

    pub async fn get_proposal(&self, id: Uuid) -> Result<Proposal, CurationError> {
        self.store
            .get_proposal(id)
            .await?
            .ok_or_else(|| CurationError::not_found("proposal", id))
    }

    /// Proposals awaiting a bounty, oldest first.
    pub async fn open_proposals(&self) -> Result<Vec<Proposal>, CurationError> {
        Ok(self.store.open_proposals().await?)
    }

    /// Fulfil a proposal: create the bounty (target copied from the
    /// proposal, reward possibly adjusted from the suggestion) and link the
    /// proposal to it in one transaction. Requires the actor to be an editor
    /// on the target's topic scope; a target with no topic scope has no
    /// editors and cannot take a bounty this way.
    pub async fn issue_bounty(
        &self,
        actor: Uuid,
        proposal_id: Uuid,
        reward_cents: i64,
        bounty_type_id: Option<Uuid>,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Bounty, CurationError> {
        if reward_cents < 0 {
            return Err(CurationError::validation(
                "reward_cents",
                "reward must not be negative",
            ));
        }
        let proposal = self.get_proposal(proposal_id).await?;
        if proposal.is_fulfilled() {
            return Err(CurationError::conflict("proposal already fulfilled"));
        }
        let resolved = self.resolve_target(proposal.target).await?;
        let Some(scope) = resolved.topic_scope else {
            return Err(CurationError::Forbidden);
        };
        if !self.access.can_edit_topic(actor, scope).await? {
            return Err(CurationError::Forbidden);
        }
        let bounty = self
            .store
            .issue_bounty_for_proposal(proposal_id, actor, reward_cents, bounty_type_id, date_expire)
            .await?;
        info!(proposal_id = %proposal_id, bounty_id = %bounty.id, issuer = %actor, "bounty issued");
        Ok(bounty)
    }

    // ---- bounties ----

    /// Create a system-issued bounty (no issuer) directly, outside the
    /// proposal pipeline.
    pub async fn create_system_bounty(
        &self,
        target: TargetRef,
        reward_cents: i64,
        bounty_type_id: Option<Uuid>,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Bounty, CurationError> {
        if reward_cents < 0 {
            return Err(CurationError::validation(
                "reward_cents",
                "reward must not be negative",
            ));
        }
        self.resolve_target(target).await?;
        Ok(self
            .store
            .create_bounty(target, None, reward_cents, bounty_type_id, date_expire)
            .await?)
    }

    pub async fn get_bounty(&self, id: Uuid) -> Result<Bounty, CurationError> {
        self.store
            .get_bounty(id)
            .await?
            .ok_or_else(|| CurationError::not_found("bounty", id))
    }

    /// Claim a bounty. Sets claimer and completion timestamp exactly once;
    /// the second claimer sees `Conflict`, a claim past the deadline sees
    /// `Expired`.
    pub async fn claim_bounty(&self, actor: Uuid, id: Uuid) -> Result<Bounty, CurationError> {
        // Existence check up front so an unknown id is NotFound, not Conflict.
        self.get_bounty(id).await?;

        let now = Utc::now();
        if self.store.try_claim_bounty(id, actor, now).await? {
            info!(bounty_id = %id, claimer = %actor, "bounty claimed");
            return self.get_bounty(id).await;
        }

        // The guarded update did not match; the fresh row says why. Claimed
        // and expired are both sticky, so this diagnosis is stable.
        let bounty = self.get_bounty(id).await?;
        if bounty.is_claimed() {
            Err(CurationError::conflict("bounty already claimed"))
        } else if bounty.is_expired(now) {
            Err(CurationError::Expired)
        } else if !bounty.active {
            Err(CurationError::conflict("bounty is inactive"))
        } else {
            Err(CurationError::conflict("bounty changed state during claim"))
        }
    }

    /// Flip a bounty's active flag. Issuer only; a completed bounty is
    /// settled and can no longer be deactivated.
    pub async fn set_bounty_active(
        &self,
        actor: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<Bounty, CurationError> {
        let bounty = self.get_bounty(id).await?;
        if bounty.issuer != Some(actor) {
            return Err(CurationError::Forbidden);
        }
        if !self.store.try_set_bounty_active(id, active).await? {
            return Err(CurationError::conflict("bounty already completed"));
        }
        self.get_bounty(id).await
    }

    pub async fn create_bounty_type(
        &self,
        name: String,
        description: String,
    ) -> Result<BountyType, CurationError> {
        if name.trim().is_empty() {
            return Err(CurationError::validation("name", "name must not be empty"));
        }
        Ok(self.store.create_bounty_type(name, description).await?)
    }

    // ---- contribution ledger ----

    /// Append a contribution row for a person against a target.
    pub async fn record_contribution(
        &self,
        person_id: Uuid,
        target: TargetRef,
    ) -> Result<Contribution, CurationError> {
        self.resolve_target(target).await?;
        Ok(self.store.add_contribution(person_id, target).await?)
    }

    pub async fn contributions(&self, target: TargetRef) -> Result<Vec<Contribution>, CurationError> {
        Ok(self.store.contributions_for_target(target).await?)
    }
}
