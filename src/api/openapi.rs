//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation generation.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Topics
        crate::routes::topics::create_topic,
        crate::routes::topics::get_topic,
        crate::routes::topics::delete_topic,
        crate::routes::topics::create_edge,
        crate::routes::topics::get_descendants,
        crate::routes::topics::get_ancestors,
        // Lists
        crate::routes::lists::create_list,
        crate::routes::lists::get_list,
        crate::routes::lists::update_list,
        crate::routes::lists::delete_list,
        crate::routes::lists::set_active,
        crate::routes::lists::submit_list,
        crate::routes::lists::claim_list,
        crate::routes::lists::release_list,
        crate::routes::lists::return_list,
        crate::routes::lists::publish_list,
        crate::routes::lists::clone_list,
        crate::routes::lists::get_items,
        crate::routes::lists::create_item,
        crate::routes::lists::reorder_items,
        crate::routes::lists::update_item,
        crate::routes::lists::delete_item,
        crate::routes::lists::get_comments,
        crate::routes::lists::add_comment,
        crate::routes::lists::add_favorite,
        crate::routes::lists::remove_favorite,
        // Search
        crate::routes::search::search_lists,
        // Review workflow
        crate::routes::review::create_proposal,
        crate::routes::review::open_proposals,
        crate::routes::review::get_proposal,
        crate::routes::review::issue_bounty,
        crate::routes::review::create_system_bounty,
        crate::routes::review::get_bounty,
        crate::routes::review::claim_bounty,
        crate::routes::review::set_bounty_active,
        crate::routes::review::create_bounty_type,
        crate::routes::review::get_contributions,
        // Profiles and subscriptions
        crate::routes::profiles::upsert_profile,
        crate::routes::profiles::get_profile,
        crate::routes::profiles::add_friend,
        crate::routes::profiles::get_friends,
        crate::routes::profiles::get_favorites,
        crate::routes::profiles::create_group,
        crate::routes::profiles::add_group_member,
        crate::routes::profiles::create_subscription,
    ),
    components(schemas(
        crate::routes::topics::CreateTopicRequest,
        crate::routes::topics::CreateEdgeRequest,
        crate::routes::topics::TopicResponse,
        crate::routes::topics::EdgeResponse,
        crate::routes::topics::TraversalRowResponse,
        crate::routes::topics::TraversalResponse,
        crate::routes::lists::CreateListRequest,
        crate::routes::lists::SetActiveRequest,
        crate::routes::lists::CreateItemRequest,
        crate::routes::lists::UpdateItemRequest,
        crate::routes::lists::ReorderRequest,
        crate::routes::lists::CommentRequest,
        crate::routes::search::SearchHitResponse,
        crate::routes::search::SearchResponse,
        crate::routes::review::TargetRequest,
        crate::routes::review::CreateProposalRequest,
        crate::routes::review::IssueBountyRequest,
        crate::routes::review::CreateBountyRequest,
        crate::routes::review::BountyActiveRequest,
        crate::routes::review::CreateBountyTypeRequest,
        crate::routes::profiles::ProfileRequest,
        crate::routes::profiles::CreateGroupRequest,
        crate::routes::profiles::CreateSubscriptionRequest,
    )),
    info(
        title = "List Curation API",
        description = "Curation API for collaborative ranked lists organised under a topic taxonomy",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
