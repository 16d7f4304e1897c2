//! Unit tests for the domain models.

use chrono::{Duration, Utc};
use list_curation_api::models::{
    Bounty, EntityKind, List, ListItem, ListStatus, Proposal, Subscription, TargetRef,
};
use uuid::Uuid;

#[test]
fn test_new_list_defaults() {
    let creator = Uuid::new_v4();
    let list = List::new("Thyroid workup".to_string(), String::new(), None, Some(creator));

    assert_eq!(list.status, ListStatus::Draft);
    assert_eq!(list.version, 1);
    assert!(list.active);
    assert!(list.lock_user.is_none());
    assert!(list.parent_list.is_none());
    assert!(list.is_creator(creator));
    assert!(!list.is_creator(Uuid::new_v4()));
}

#[test]
fn test_list_serialization_skips_empty_refs() {
    let list = List::new("Adrenal".to_string(), String::new(), None, None);
    let json = serde_json::to_string(&list).unwrap();

    assert!(json.contains("\"status\":\"draft\""));
    assert!(!json.contains("lock_user"));
    assert!(!json.contains("parent_list"));
    assert!(!json.contains("topic_id"));
}

#[test]
fn test_list_status_roundtrip() {
    for status in [ListStatus::Draft, ListStatus::Submitted, ListStatus::Published] {
        assert_eq!(ListStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(ListStatus::parse("archived"), None);

    let json = serde_json::to_string(&ListStatus::Submitted).unwrap();
    assert_eq!(json, "\"submitted\"");
}

#[test]
fn test_entity_kind_roundtrip() {
    for kind in [EntityKind::List, EntityKind::ListItem, EntityKind::Topic] {
        assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(EntityKind::parse("workspace"), None);
}

#[test]
fn test_target_ref_constructors() {
    let id = Uuid::new_v4();
    assert_eq!(TargetRef::list(id).kind, EntityKind::List);
    assert_eq!(TargetRef::list_item(id).kind, EntityKind::ListItem);
    assert_eq!(TargetRef::topic(id).kind, EntityKind::Topic);
    assert_eq!(TargetRef::list(id).id, id);
}

#[test]
fn test_bounty_claim_state() {
    let now = Utc::now();
    let mut bounty = Bounty::new(TargetRef::list(Uuid::new_v4()), None, 500, None, None);
    assert!(!bounty.is_claimed());
    assert!(!bounty.is_expired(now));

    bounty.claimer = Some(Uuid::new_v4());
    bounty.date_completed = Some(now);
    assert!(bounty.is_claimed());
}

#[test]
fn test_bounty_expiry() {
    let now = Utc::now();
    let expired = Bounty::new(
        TargetRef::list(Uuid::new_v4()),
        None,
        500,
        None,
        Some(now - Duration::hours(1)),
    );
    assert!(expired.is_expired(now));

    let open = Bounty::new(
        TargetRef::list(Uuid::new_v4()),
        None,
        500,
        None,
        Some(now + Duration::hours(1)),
    );
    assert!(!open.is_expired(now));
}

#[test]
fn test_subscription_liveness() {
    let now = Utc::now();
    let group = Uuid::new_v4();
    let topic = Uuid::new_v4();

    let open_ended = Subscription::new(group, topic, false, 0, None);
    assert!(open_ended.is_live(now));

    let expired = Subscription::new(group, topic, true, 9900, Some(now - Duration::days(1)));
    assert!(!expired.is_live(now));

    let mut inactive = Subscription::new(group, topic, true, 9900, Some(now + Duration::days(30)));
    inactive.active = false;
    assert!(!inactive.is_live(now));
}

#[test]
fn test_proposal_fulfilment() {
    let mut proposal = Proposal::new(
        TargetRef::topic(Uuid::new_v4()),
        Some(Uuid::new_v4()),
        "needs a starter list".to_string(),
        1000,
    );
    assert!(!proposal.is_fulfilled());
    proposal.bounty_id = Some(Uuid::new_v4());
    assert!(proposal.is_fulfilled());
}

#[test]
fn test_item_ordering_fields() {
    let list_id = Uuid::new_v4();
    let item = ListItem::new(list_id, "First".to_string(), String::new(), String::new(), 0);
    assert_eq!(item.list_id, list_id);
    assert_eq!(item.position, 0);
    assert!(item.active);
}
