//! Persistence and row sources for the table view engine

pub mod cache;
pub mod config;
pub mod sources;
pub mod store;
pub mod view_state;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use cache::PageCache;
pub use config::{TableConfig, TableFeatures};
pub use sources::{CsvSource, Page, PageRequest, PageSource, StaticPageSource};
pub use store::{FileStore, KeyValueStore, MemoryStore, SqliteStore};
pub use view_state::{StoredViewState, ViewState, ViewStateStore};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("SQLite error: {0}")]
    Sqlite(String),

    #[error("Corrupted entry '{key}': {reason}")]
    Corrupted { key: String, reason: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(error: rusqlite::Error) -> Self {
        DataError::Sqlite(error.to_string())
    }
}
