use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::TodoError;
use crate::model::{StoredTodo, TodoDocument, TodoFields, TodoId};

/// In-process store keeping todos in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<StoredTodo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn ping(&self) -> Result<(), TodoError> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<StoredTodo>, TodoError> {
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<StoredTodo>, TodoError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|todo| todo.id == *id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<StoredTodo>, TodoError> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .find(|todo| todo.document.title == title)
            .cloned())
    }

    async fn insert(&self, document: TodoDocument) -> Result<TodoId, TodoError> {
        let id = TodoId::generate();
        self.todos.write().await.push(StoredTodo { id, document });
        Ok(id)
    }

    async fn update(&self, id: &TodoId, fields: &TodoFields) -> Result<u64, TodoError> {
        let mut todos = self.todos.write().await;
        let modified = todos
            .iter_mut()
            .find(|todo| todo.id == *id)
            .is_some_and(|todo| todo.document.apply(fields));
        Ok(u64::from(modified))
    }

    async fn delete(&self, id: &TodoId) -> Result<u64, TodoError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|todo| todo.id != *id);
        Ok((before - todos.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(title: &str, status: &str) -> TodoDocument {
        TodoDocument::new(TodoFields {
            title: title.to_string(),
            description: "d".to_string(),
            status: status.to_string(),
        })
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = MemoryStore::new();
        let first = store.insert(document("first", "open")).await.unwrap();
        let second = store.insert(document("second", "open")).await.unwrap();

        let ids: Vec<TodoId> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn find_by_title_returns_first_match() {
        let store = MemoryStore::new();
        let first = store.insert(document("dup", "open")).await.unwrap();
        store.insert(document("dup", "done")).await.unwrap();

        let found = store.find_by_title("dup").await.unwrap().unwrap();
        assert_eq!(found.id, first);
        assert!(store.find_by_title("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_counts_only_real_changes() {
        let store = MemoryStore::new();
        let id = store.insert(document("A", "open")).await.unwrap();
        let unchanged = TodoFields {
            title: "A".to_string(),
            description: "d".to_string(),
            status: "open".to_string(),
        };
        let changed = TodoFields {
            status: "done".to_string(),
            ..unchanged.clone()
        };

        assert_eq!(store.update(&id, &unchanged).await.unwrap(), 0);
        assert_eq!(store.update(&id, &changed).await.unwrap(), 1);
        assert_eq!(store.update(&TodoId::generate(), &changed).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_counts_removed_records() {
        let store = MemoryStore::new();
        let id = store.insert(document("A", "open")).await.unwrap();

        assert_eq!(store.delete(&id).await.unwrap(), 1);
        assert_eq!(store.delete(&id).await.unwrap(), 0);
        assert!(store.find_by_id(&id).await.unwrap().is_none());
    }
}
