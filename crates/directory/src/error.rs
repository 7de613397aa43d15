use thiserror::Error;

/// Errors that can occur resolving tenant directory records.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// An error from the underlying storage backend.
    #[error("storage error: {0}")]
    Storage(String),
}
