//! Storage trait definition for the curation store backends.
//!
//! The trait is the seam between the workflow services and the relational
//! store. Guarded state changes (list transitions, bounty claims) are single
//! conditional updates returning whether the guard matched — the services
//! turn a `false` into the right domain error after re-reading the row.

use crate::models::{
    Bounty, BountyType, Contribution, FavoriteList, GroupMember, List, ListComment, ListItem,
    Person, Proposal, SubscriberGroup, Subscription, TargetRef, TopicEdge, TopicNode,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::StorageError;

/// Storage backend trait for the curation data model.
#[async_trait::async_trait]
pub trait CurationStore: Send + Sync {
    // ---- topics ----

    /// Create a topic node.
    async fn create_topic(&self, name: String, description: String)
    -> Result<TopicNode, StorageError>;

    /// Get a topic node by id.
    async fn get_topic(&self, id: Uuid) -> Result<Option<TopicNode>, StorageError>;

    /// Topics whose name contains the given substring, ordered by name.
    async fn topics_by_name(&self, name_substring: &str) -> Result<Vec<TopicNode>, StorageError>;

    /// Delete a topic node. Lists under it keep their rows with the topic
    /// reference cleared; edges and subscriptions on it are dropped.
    async fn delete_topic(&self, id: Uuid) -> Result<(), StorageError>;

    /// Insert a parent → child edge. The caller has already validated the
    /// edge (no self-loop, no cycle); the store only rejects duplicates.
    async fn create_topic_edge(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
        description: String,
    ) -> Result<TopicEdge, StorageError>;

    /// Snapshot of every edge in the topic graph.
    async fn topic_edges(&self) -> Result<Vec<TopicEdge>, StorageError>;

    // ---- lists ----

    async fn create_list(
        &self,
        title: String,
        description: String,
        topic_id: Option<Uuid>,
        creator: Option<Uuid>,
    ) -> Result<List, StorageError>;

    async fn get_list(&self, id: Uuid) -> Result<Option<List>, StorageError>;

    /// Rewrite title/description/topic of a list. State guards live in the
    /// lifecycle service.
    async fn update_list_content(
        &self,
        id: Uuid,
        title: String,
        description: String,
        topic_id: Option<Uuid>,
    ) -> Result<List, StorageError>;

    async fn set_list_active(&self, id: Uuid, active: bool) -> Result<List, StorageError>;

    async fn delete_list(&self, id: Uuid) -> Result<(), StorageError>;

    /// draft → submitted, guarded on the row still being a draft.
    async fn try_submit_list(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Take the review lock, guarded on `status = submitted ∧ lock_user IS
    /// NULL`. At most one concurrent caller sees `true`.
    async fn try_claim_list(&self, id: Uuid, editor: Uuid) -> Result<bool, StorageError>;

    /// Drop the review lock, guarded on the caller holding it.
    async fn try_release_list(&self, id: Uuid, editor: Uuid) -> Result<bool, StorageError>;

    /// submitted → draft, guarded on the lock being free.
    async fn try_return_list_to_draft(&self, id: Uuid) -> Result<bool, StorageError>;

    /// submitted → published, guarded on the caller holding the lock.
    /// Clears the lock in the same statement.
    async fn try_publish_list(&self, id: Uuid, editor: Uuid) -> Result<bool, StorageError>;

    /// Copy a list and its items into a new draft row: `version` bumped,
    /// `parent_list` pointing at the source. One transaction.
    async fn clone_list(&self, source_id: Uuid, creator: Option<Uuid>)
    -> Result<List, StorageError>;

    /// Published, active lists matching a title substring and/or a topic id
    /// set, newest first.
    async fn search_published_lists(
        &self,
        title_substring: Option<&str>,
        topic_ids: Option<&[Uuid]>,
        limit: u32,
    ) -> Result<Vec<List>, StorageError>;

    // ---- list items ----

    /// Append an item at the end of the list's ordering.
    async fn create_item(
        &self,
        list_id: Uuid,
        title: String,
        description: String,
        deep_dive: String,
    ) -> Result<ListItem, StorageError>;

    async fn get_item(&self, id: Uuid) -> Result<Option<ListItem>, StorageError>;

    async fn update_item(
        &self,
        id: Uuid,
        title: String,
        description: String,
        deep_dive: String,
        active: bool,
    ) -> Result<ListItem, StorageError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), StorageError>;

    /// Items of a list in sibling order.
    async fn list_items(&self, list_id: Uuid) -> Result<Vec<ListItem>, StorageError>;

    /// Rewrite the sibling order to match `ordered_ids` (validated by the
    /// caller to be exactly the list's item set).
    async fn reorder_items(&self, list_id: Uuid, ordered_ids: &[Uuid]) -> Result<(), StorageError>;

    // ---- comments ----

    async fn add_comment(
        &self,
        list_id: Uuid,
        author: Option<Uuid>,
        message: String,
    ) -> Result<ListComment, StorageError>;

    async fn list_comments(&self, list_id: Uuid) -> Result<Vec<ListComment>, StorageError>;

    // ---- people, groups, favourites ----

    /// Create or update the profile row for an identity.
    async fn upsert_person(
        &self,
        id: Uuid,
        degrees: String,
        job_title: String,
        personal_description: String,
    ) -> Result<Person, StorageError>;

    async fn get_person(&self, id: Uuid) -> Result<Option<Person>, StorageError>;

    /// Record a (symmetric) friendship between two people.
    async fn add_friend(&self, person_id: Uuid, friend_id: Uuid) -> Result<(), StorageError>;

    async fn friends_of(&self, person_id: Uuid) -> Result<Vec<Uuid>, StorageError>;

    async fn add_favorite(&self, person_id: Uuid, list_id: Uuid)
    -> Result<FavoriteList, StorageError>;

    async fn remove_favorite(&self, person_id: Uuid, list_id: Uuid) -> Result<(), StorageError>;

    async fn favorites_of(&self, person_id: Uuid) -> Result<Vec<FavoriteList>, StorageError>;

    /// Create a subscriber group; names are unique.
    async fn create_group(&self, name: String) -> Result<SubscriberGroup, StorageError>;

    async fn get_group(&self, id: Uuid) -> Result<Option<SubscriberGroup>, StorageError>;

    async fn add_group_member(
        &self,
        person_id: Uuid,
        group_id: Uuid,
    ) -> Result<GroupMember, StorageError>;

    async fn groups_of_person(&self, person_id: Uuid) -> Result<Vec<Uuid>, StorageError>;

    // ---- subscriptions ----

    async fn create_subscription(
        &self,
        group_id: Uuid,
        topic_id: Uuid,
        edit_power: bool,
        price_cents: i64,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Subscription, StorageError>;

    /// Subscriptions held by any of the given groups (regardless of
    /// active/expiry — liveness is computed by the access service).
    async fn subscriptions_for_groups(
        &self,
        group_ids: &[Uuid],
    ) -> Result<Vec<Subscription>, StorageError>;

    // ---- review workflow ----

    async fn create_bounty_type(
        &self,
        name: String,
        description: String,
    ) -> Result<BountyType, StorageError>;

    async fn create_bounty(
        &self,
        target: TargetRef,
        issuer: Option<Uuid>,
        reward_cents: i64,
        bounty_type_id: Option<Uuid>,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Bounty, StorageError>;

    async fn get_bounty(&self, id: Uuid) -> Result<Option<Bounty>, StorageError>;

    /// Claim a bounty: sets claimer and completion timestamp and appends the
    /// claimer's contribution row in one transaction, guarded on the bounty
    /// being active, unclaimed and unexpired at `now`. At most one concurrent
    /// caller sees `true`.
    async fn try_claim_bounty(
        &self,
        id: Uuid,
        claimer: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Flip a bounty's active flag, guarded on it not being completed.
    async fn try_set_bounty_active(&self, id: Uuid, active: bool) -> Result<bool, StorageError>;

    async fn create_proposal(
        &self,
        target: TargetRef,
        author: Option<Uuid>,
        message: String,
        suggested_reward_cents: i64,
    ) -> Result<Proposal, StorageError>;

    async fn get_proposal(&self, id: Uuid) -> Result<Option<Proposal>, StorageError>;

    /// Proposals not yet linked to a bounty, oldest first.
    async fn open_proposals(&self) -> Result<Vec<Proposal>, StorageError>;

    /// Create the bounty for a proposal and link the proposal to it in one
    /// transaction. Fails with `Conflict` if the proposal is already
    /// fulfilled — fulfilment is one-way.
    async fn issue_bounty_for_proposal(
        &self,
        proposal_id: Uuid,
        issuer: Uuid,
        reward_cents: i64,
        bounty_type_id: Option<Uuid>,
        date_expire: Option<DateTime<Utc>>,
    ) -> Result<Bounty, StorageError>;

    // ---- contribution ledger ----

    async fn add_contribution(
        &self,
        person_id: Uuid,
        target: TargetRef,
    ) -> Result<Contribution, StorageError>;

    async fn contributions_for_target(
        &self,
        target: TargetRef,
    ) -> Result<Vec<Contribution>, StorageError>;
}
