//! Published-list query surface.
//!
//! Title-substring search with an optional topic filter. The topic filter
//! expands to the topic's descendants through the graph — a leaf topic
//! short-circuits the expansion. Only published, active lists come back,
//! newest first.

use crate::graph;
use crate::models::{List, ListItem, ListStatus};
use crate::storage::CurationStore;
use std::sync::Arc;
use uuid::Uuid;

use super::error::CurationError;

/// Default result cap when the caller does not pass one.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// One search result with the topic name joined in for display.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub list: List,
    pub topic_name: Option<String>,
}

#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn CurationStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn CurationStore>) -> Self {
        Self { store }
    }

    /// Search published lists by title substring and/or topic name.
    ///
    /// The topic parameter is matched as a name substring; the first match
    /// (by name order) wins. An unmatched topic name simply drops the topic
    /// filter, mirroring a search box that ignores an unknown topic.
    pub async fn search_lists(
        &self,
        title: Option<&str>,
        topic: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<SearchHit>, CurationError> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        let topic_ids = match topic {
            Some(name) if !name.trim().is_empty() => {
                match self.store.topics_by_name(name).await?.into_iter().next() {
                    Some(node) => {
                        let edges = self.store.topic_edges().await?;
                        let mut ids = if graph::has_children(&edges, node.id) {
                            graph::descendant_ids(&edges, node.id)
                        } else {
                            Vec::new()
                        };
                        ids.push(node.id);
                        Some(ids)
                    }
                    None => None,
                }
            }
            _ => None,
        };

        let lists = self
            .store
            .search_published_lists(title, topic_ids.as_deref(), limit)
            .await?;

        let mut hits = Vec::with_capacity(lists.len());
        for list in lists {
            let topic_name = match list.topic_id {
                Some(topic_id) => self.store.get_topic(topic_id).await?.map(|t| t.name),
                None => None,
            };
            hits.push(SearchHit { list, topic_name });
        }
        Ok(hits)
    }

    /// Ordered items of a published, active list.
    pub async fn published_list_items(&self, list_id: Uuid) -> Result<Vec<ListItem>, CurationError> {
        let list = self
            .store
            .get_list(list_id)
            .await?
            .ok_or_else(|| CurationError::not_found("list", list_id))?;
        if list.status != ListStatus::Published || !list.active {
            return Err(CurationError::not_found("list", list_id));
        }
        Ok(self.store.list_items(list_id).await?)
    }
}
