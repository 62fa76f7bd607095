//! Post error types.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Post operation errors.
#[derive(Debug, Error)]
pub enum PostError {
    /// One or more validation rules were violated.
    ///
    /// Carries the ordered, human-readable message list returned to the
    /// client; never fatal to the service.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Attachment not found.
    #[error("attachment not found: {0}")]
    AttachmentNotFound(Uuid),

    /// Default asset download failed. Aborts the create operation.
    #[error("default asset fetch failed: {0}")]
    DefaultAssetFetch(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl PostError {
    /// Create a validation error from a single message.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    /// Create an attachment not found error.
    #[must_use]
    pub fn attachment_not_found(id: Uuid) -> Self {
        Self::AttachmentNotFound(id)
    }

    /// Create a default asset fetch error.
    #[must_use]
    pub fn default_asset_fetch(msg: impl Into<String>) -> Self {
        Self::DefaultAssetFetch(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
