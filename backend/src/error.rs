/// Error type for todo storage and service operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Zero records matched, were modified, or were deleted.
    #[error("Todo not found")]
    NotFound,
    /// The identifier is not in the store's native format.
    #[error("'{0}' is not a valid todo id: {1}")]
    InvalidId(String, uuid::Error),
    /// No usable connection to the document store.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),
    #[error("Document store error: {0}")]
    Storage(#[from] redis::RedisError),
    /// A stored document could not be encoded or decoded.
    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound)
    }
}
