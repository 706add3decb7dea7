//! Key-value backing store.
//!
//! The post store keeps its whole state under a single key; this module only moves strings.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppError;

/// Path value that selects the in-memory store instead of a SQLite file.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Persistent string-to-string storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Store `value` under `key`, replacing any prior value.
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Open the backing store named by `db_path`.
pub async fn open_store(db_path: &Path) -> Result<Arc<dyn KeyValueStore>, AppError> {
    if db_path == Path::new(IN_MEMORY_PATH) {
        tracing::warn!("Using in-memory storage; posts will not survive a restart");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let pool = init_database(db_path).await?;
    Ok(Arc::new(SqliteStore::new(pool)))
}
