//! Error types for local socket operations

use thiserror::Error;

/// Error type for local socket operations
#[derive(Debug, Clone, Error)]
pub enum LocalSocketError {
    /// Failed to bind to the specified address
    #[error("Failed to bind socket: {0}")]
    Bind(String),
    /// Failed to set socket to non-blocking mode
    #[error("Failed to set non-blocking: {0}")]
    NonBlocking(String),
}
