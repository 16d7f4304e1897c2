// Models module - domain entities for topics, lists, people, subscriptions
// and the review workflow.

#[path = "enums.rs"]
pub mod enums;
pub mod list;
pub mod person;
pub mod review;
pub mod subscription;
pub mod target;
pub mod topic;

pub use enums::{EntityKind, ListStatus};
pub use list::{List, ListComment, ListItem};
pub use person::{FavoriteList, GroupMember, Person, SubscriberGroup};
pub use review::{Bounty, BountyType, Proposal};
pub use subscription::Subscription;
pub use target::{Contribution, TargetRef};
pub use topic::{TopicEdge, TopicNode};
