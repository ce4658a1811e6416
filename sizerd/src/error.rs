//! Daemon error types.

use sizer_connectors::FeedError;
use sizer_domain::DomainError;
use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Domain error (unknown coin, unknown field, invalid price)
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Price feed error
    #[error("Price feed error: {0}")]
    Feed(#[from] FeedError),

    /// Request body could not be used
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
