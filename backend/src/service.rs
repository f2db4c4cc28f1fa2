use std::sync::Arc;

use todo_shared::{CreatedTodo, Todo, TodoInput};

use crate::error::TodoError;
use crate::model::{TodoDocument, TodoFields, TodoId};
use crate::store::TodoStore;

/// Todo operations over a shared storage client.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Checks that the underlying store is reachable.
    pub async fn ping(&self) -> Result<(), TodoError> {
        self.store.ping().await
    }

    /// Retrieves every todo in store order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let todos = self.store.find_all().await?;
        Ok(todos.into_iter().map(Todo::from).collect())
    }

    /// Retrieves a todo by its identifier.
    ///
    /// # Returns
    ///
    /// [`TodoError::InvalidId`] if `id` is malformed, [`TodoError::NotFound`] if
    /// no todo has that id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Todo, TodoError> {
        let id: TodoId = id.parse()?;
        self.store
            .find_by_id(&id)
            .await?
            .map(Todo::from)
            .ok_or(TodoError::NotFound)
    }

    /// Retrieves the first todo whose title matches exactly.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_title(&self, title: &str) -> Result<Todo, TodoError> {
        self.store
            .find_by_title(title)
            .await?
            .map(Todo::from)
            .ok_or(TodoError::NotFound)
    }

    /// Creates a todo stamped with the current time.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, input: TodoInput) -> Result<CreatedTodo, TodoError> {
        let id = self
            .store
            .insert(TodoDocument::new(TodoFields::from(input)))
            .await?;
        tracing::info!(%id, "Created todo");
        Ok(CreatedTodo { id: id.to_string() })
    }

    /// Replaces title, description and status of a todo.
    ///
    /// Reports [`TodoError::NotFound`] when nothing was modified, which also
    /// covers an update whose values equal the stored ones.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: &str, input: TodoInput) -> Result<(), TodoError> {
        let id: TodoId = id.parse()?;
        match self.store.update(&id, &TodoFields::from(input)).await? {
            0 => Err(TodoError::NotFound),
            _ => Ok(()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), TodoError> {
        let id: TodoId = id.parse()?;
        match self.store.delete(&id).await? {
            0 => Err(TodoError::NotFound),
            _ => Ok(()),
        }
    }
}
