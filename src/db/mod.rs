pub mod connection;
pub mod kv;

pub use connection::{init_db, Database};
pub use kv::{KeyValueStore, Write};

use thiserror::Error;

/// Errors produced by the local storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Connection slot unavailable on this thread")]
    ConnectionUnavailable,
}
