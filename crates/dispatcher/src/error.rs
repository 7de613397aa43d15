use thiserror::Error;

/// Errors that can occur constructing or operating a dispatcher.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// The dispatcher was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}
