//! Services module - workflow logic over the curation store.

pub mod access_service;
pub mod error;
pub mod lifecycle_service;
pub mod review_service;
pub mod search_projection;
pub mod search_service;
pub mod topic_service;

pub use access_service::AccessService;
pub use error::CurationError;
pub use lifecycle_service::LifecycleService;
pub use review_service::{ResolvedTarget, ReviewService};
pub use search_projection::{IndexOp, IndexSink, RecordingSink, SearchDocument, TracingSink};
pub use search_service::{SearchHit, SearchService};
pub use topic_service::TopicService;
