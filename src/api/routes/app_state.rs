//! Application state management.
//!
//! Holds the shared store and index sink handles and hands out the workflow
//! services route handlers run against. Services are cheap to construct:
//! they only clone the shared handles.

use crate::services::{
    AccessService, IndexSink, LifecycleService, ReviewService, SearchService, TopicService,
    TracingSink,
};
use crate::storage::{CurationStore, SqliteStore, StorageError};
use std::path::Path;
use std::sync::Arc;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Curation store backend
    pub store: Arc<dyn CurationStore>,
    /// Search index hand-off (fire-and-forget)
    pub index: Arc<dyn IndexSink>,
}

impl AppState {
    pub fn new(store: Arc<dyn CurationStore>, index: Arc<dyn IndexSink>) -> Self {
        Self { store, index }
    }

    /// State over an in-memory store with a logging index sink. Used by
    /// tests and ad hoc runs without a configured database.
    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(
            Arc::new(SqliteStore::in_memory()?),
            Arc::new(TracingSink),
        ))
    }

    /// State over an on-disk store at the given path.
    pub fn with_database(path: &Path) -> Result<Self, StorageError> {
        Ok(Self::new(
            Arc::new(SqliteStore::new(path)?),
            Arc::new(TracingSink),
        ))
    }

    pub fn topics(&self) -> TopicService {
        TopicService::new(self.store.clone(), self.index.clone())
    }

    pub fn access(&self) -> AccessService {
        AccessService::new(self.store.clone())
    }

    pub fn lifecycle(&self) -> LifecycleService {
        LifecycleService::new(self.store.clone(), self.access(), self.index.clone())
    }

    pub fn review(&self) -> ReviewService {
        ReviewService::new(self.store.clone(), self.access())
    }

    pub fn search(&self) -> SearchService {
        SearchService::new(self.store.clone())
    }
}
