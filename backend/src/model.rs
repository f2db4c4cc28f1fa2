use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use todo_shared::{Todo, TodoInput};
use uuid::Uuid;

use crate::error::TodoError;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Store-assigned identifier of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(Uuid);

impl TodoId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TodoId {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TodoError::InvalidId(s.to_string(), e))
    }
}

/// The three fields a client may replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: String,
    pub status: String,
}

impl From<TodoInput> for TodoFields {
    fn from(input: TodoInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            status: input.status,
        }
    }
}

/// Schema of a todo as persisted in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDocument {
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: String,
}

impl TodoDocument {
    /// Builds a fresh document stamped with the current local time.
    pub fn new(fields: TodoFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            status: fields.status,
            created_at: chrono::Local::now().format(CREATED_AT_FORMAT).to_string(),
        }
    }

    /// Replaces the mutable fields. Returns whether anything changed.
    pub fn apply(&mut self, fields: &TodoFields) -> bool {
        if self.title == fields.title
            && self.description == fields.description
            && self.status == fields.status
        {
            return false;
        }
        self.title.clone_from(&fields.title);
        self.description.clone_from(&fields.description);
        self.status.clone_from(&fields.status);
        true
    }
}

/// A document together with the identifier it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTodo {
    pub id: TodoId,
    pub document: TodoDocument,
}

impl From<StoredTodo> for Todo {
    fn from(stored: StoredTodo) -> Self {
        Self {
            id: stored.id.to_string(),
            title: stored.document.title,
            description: stored.document.description,
            status: stored.document.status,
            created_at: stored.document.created_at,
        }
    }
}
