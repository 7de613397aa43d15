use thiserror::Error;

/// Errors that can occur during policy store operations.
#[derive(Debug, Error)]
pub enum PolicyStoreError {
    /// An error from the underlying storage backend.
    #[error("storage error: {0}")]
    Storage(String),

    /// The referenced version does not exist for the tenant.
    #[error("policy version not found: {0}")]
    VersionNotFound(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
