//! Document store access.
//!
//! Every method is a single storage call. Consistency across concurrent
//! requests is left to the store's own per-operation atomicity.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, StoreBackend};
use crate::error::TodoError;
use crate::model::{StoredTodo, TodoDocument, TodoFields, TodoId};

mod memory;
mod todo_redis;

pub use memory::MemoryStore;
pub use todo_redis::RedisStore;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), TodoError>;

    /// All todos in store order.
    async fn find_all(&self) -> Result<Vec<StoredTodo>, TodoError>;

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<StoredTodo>, TodoError>;

    /// First todo in store order whose title equals `title` exactly.
    async fn find_by_title(&self, title: &str) -> Result<Option<StoredTodo>, TodoError>;

    /// Inserts a document and returns the identifier the store assigned.
    async fn insert(&self, document: TodoDocument) -> Result<TodoId, TodoError>;

    /// Replaces the mutable fields. Returns the number of modified records,
    /// which is zero when nothing matched or the values were already equal.
    async fn update(&self, id: &TodoId, fields: &TodoFields) -> Result<u64, TodoError>;

    /// Returns the number of deleted records.
    async fn delete(&self, id: &TodoId) -> Result<u64, TodoError>;
}

/// Builds the store selected by the configuration.
pub fn from_config(config: &Config) -> Arc<dyn TodoStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, todos will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Redis => Arc::new(RedisStore::new(
            config.db_uri.as_deref(),
            &config.db_namespace,
        )),
    }
}
