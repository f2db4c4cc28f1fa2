//! Redis-backed todo store.
//!
//! Documents are JSON strings stored under `{namespace}:todo:{id}`. The list
//! `{namespace}:todos` holds ids in insertion order and defines store order.
//! Writes spanning the document and the index run as a `MULTI` pipeline or a
//! server-side script with every key passed in `KEYS`. Reads resolve ids with
//! `LRANGE` and then `MGET` the documents, so they assume a single node, not
//! a cluster.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use tokio::sync::OnceCell;

use super::TodoStore;
use crate::error::TodoError;
use crate::model::{StoredTodo, TodoDocument, TodoFields, TodoId};

/// Ids fetched per round trip while searching by title.
const TITLE_SCAN_PAGE: isize = 100;

/// Returns 1 when the document exists and at least one field changed.
const UPDATE_SCRIPT: &str = r"
local raw = redis.call('GET', KEYS[1])
if not raw then
  return 0
end
local doc = cjson.decode(raw)
if doc.title == ARGV[1] and doc.description == ARGV[2] and doc.status == ARGV[3] then
  return 0
end
doc.title = ARGV[1]
doc.description = ARGV[2]
doc.status = ARGV[3]
redis.call('SET', KEYS[1], cjson.encode(doc))
return 1
";

pub struct RedisStore {
    client: Option<Client>,
    /// Established on first use and shared by every request afterwards.
    connection: OnceCell<ConnectionManager>,
    namespace: String,
    update_script: Script,
}

impl RedisStore {
    /// Creates the store without connecting.
    ///
    /// A missing or unparsable `uri` is logged and leaves the store unusable;
    /// every later operation fails with [`TodoError::Unavailable`].
    pub fn new(uri: Option<&str>, namespace: &str) -> Self {
        let client = match uri {
            None => {
                tracing::error!("DB_URI is not set, todo requests will fail");
                None
            }
            Some(uri) => match Client::open(uri) {
                Ok(client) => Some(client),
                Err(err) => {
                    tracing::error!("Invalid DB_URI, todo requests will fail: {}", err);
                    None
                }
            },
        };

        Self {
            client,
            connection: OnceCell::new(),
            namespace: namespace.to_string(),
            update_script: Script::new(UPDATE_SCRIPT),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager, TodoError> {
        let client = self.client.as_ref().ok_or_else(|| {
            TodoError::Unavailable("no valid DB_URI configured".to_string())
        })?;
        let manager = self
            .connection
            .get_or_try_init(|| async {
                tracing::info!("Connecting to the document store");
                // A single attempt; a failed connect is reported, not retried.
                ConnectionManager::new_with_backoff(client.clone(), 2, 100, 0).await
            })
            .await?;
        Ok(manager.clone())
    }

    fn document_prefix(&self) -> String {
        format!("{}:todo:", self.namespace)
    }

    fn document_key(&self, id: &TodoId) -> String {
        format!("{}{}", self.document_prefix(), id)
    }

    fn index_key(&self) -> String {
        format!("{}:todos", self.namespace)
    }

    /// Loads the documents for `ids`, keeping their order and skipping ids
    /// whose document is gone.
    async fn fetch(
        &self,
        conn: &mut ConnectionManager,
        ids: Vec<String>,
    ) -> Result<Vec<StoredTodo>, TodoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let prefix = self.document_prefix();
        let keys: Vec<String> = ids.iter().map(|id| format!("{prefix}{id}")).collect();
        let raw: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(conn).await?;

        ids.iter()
            .zip(raw)
            .filter_map(|(id, raw)| raw.map(|raw| (id, raw)))
            .map(|(id, raw)| -> Result<StoredTodo, TodoError> {
                let id: TodoId = id.parse()?;
                decode(id, &raw)
            })
            .collect()
    }
}

fn decode(id: TodoId, raw: &str) -> Result<StoredTodo, TodoError> {
    let document: TodoDocument = serde_json::from_str(raw)?;
    Ok(StoredTodo { id, document })
}

#[async_trait]
impl TodoStore for RedisStore {
    async fn ping(&self) -> Result<(), TodoError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<StoredTodo>, TodoError> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn.lrange(self.index_key(), 0, -1).await?;
        self.fetch(&mut conn, ids).await
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<StoredTodo>, TodoError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(self.document_key(id)).await?;
        raw.map(|raw| decode(*id, &raw)).transpose()
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<StoredTodo>, TodoError> {
        let mut conn = self.connection().await?;
        let mut start = 0;
        loop {
            let ids: Vec<String> = conn
                .lrange(self.index_key(), start, start + TITLE_SCAN_PAGE - 1)
                .await?;
            let exhausted = ids.len() < TITLE_SCAN_PAGE as usize;
            let page = self.fetch(&mut conn, ids).await?;
            if let Some(found) = page.into_iter().find(|todo| todo.document.title == title) {
                return Ok(Some(found));
            }
            if exhausted {
                return Ok(None);
            }
            start += TITLE_SCAN_PAGE;
        }
    }

    async fn insert(&self, document: TodoDocument) -> Result<TodoId, TodoError> {
        let id = TodoId::generate();
        let encoded = serde_json::to_string(&document)?;
        let mut conn = self.connection().await?;

        let _: () = redis::pipe()
            .atomic()
            .set(self.document_key(&id), encoded)
            .ignore()
            .rpush(self.index_key(), id.to_string())
            .ignore()
            .query_async(&mut conn)
            .await?;

        tracing::debug!(%id, "Inserted todo document");
        Ok(id)
    }

    async fn update(&self, id: &TodoId, fields: &TodoFields) -> Result<u64, TodoError> {
        let mut conn = self.connection().await?;
        let modified: u64 = self
            .update_script
            .key(self.document_key(id))
            .arg(&fields.title)
            .arg(&fields.description)
            .arg(&fields.status)
            .invoke_async(&mut conn)
            .await?;
        Ok(modified)
    }

    async fn delete(&self, id: &TodoId) -> Result<u64, TodoError> {
        let mut conn = self.connection().await?;
        let (deleted, _): (u64, u64) = redis::pipe()
            .atomic()
            .del(self.document_key(id))
            .lrem(self.index_key(), 0, id.to_string())
            .query_async(&mut conn)
            .await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_uri_makes_every_operation_unavailable() {
        let store = RedisStore::new(None, "test");

        let err = store.find_all().await.unwrap_err();
        assert!(matches!(err, TodoError::Unavailable(_)));
        let err = store.delete(&TodoId::generate()).await.unwrap_err();
        assert!(matches!(err, TodoError::Unavailable(_)));
    }

    #[tokio::test]
    async fn invalid_uri_is_tolerated_until_first_use() {
        let store = RedisStore::new(Some("not a uri"), "test");

        assert!(matches!(
            store.ping().await.unwrap_err(),
            TodoError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_store_fails_without_retrying() {
        // Nothing listens on port 1, so the connect is refused at once.
        let store = RedisStore::new(Some("redis://127.0.0.1:1"), "test");

        for _ in 0..2 {
            let started = std::time::Instant::now();
            let err = store.find_all().await.unwrap_err();
            assert!(matches!(err, TodoError::Storage(_)));
            assert!(started.elapsed() < std::time::Duration::from_secs(2));
        }
    }

    #[test]
    fn keys_are_namespaced() {
        let store = RedisStore::new(None, "app");
        let id = TodoId::generate();

        assert_eq!(store.document_key(&id), format!("app:todo:{id}"));
        assert_eq!(store.index_key(), "app:todos");
    }
}
