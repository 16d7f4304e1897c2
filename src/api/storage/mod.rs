//! Storage module for the API.
//!
//! Defines the store trait the workflow services run against and the SQLite
//! backend implementation.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::CurationStore;
