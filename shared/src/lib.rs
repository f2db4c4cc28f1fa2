use serde::{Deserialize, Serialize};

/// A todo as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: String,
}

/// Request body for creating or replacing a todo. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoInput {
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTodo {
    pub id: String,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Failed,
}

/// Uniform response wrapper returned by every todo endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub error: Option<String>,
    pub message: String,
    pub status: EnvelopeStatus,
}

impl<T> Envelope<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            error: None,
            message: message.into(),
            status: EnvelopeStatus::Success,
        }
    }

    pub fn failed(data: T, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
            message: message.into(),
            status: EnvelopeStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }
}

/// Body of the root liveness endpoint. Not wrapped in an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn running() -> Self {
        Self {
            status: "Server is running".to_string(),
        }
    }
}
