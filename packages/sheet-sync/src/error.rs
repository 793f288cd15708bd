//! Typed errors for the synchronizer and its stores.

use thiserror::Error;

/// Errors raised by a [`TabularStore`](crate::TabularStore) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Destination does not exist or is not accessible to our credentials
    #[error("destination not found: {id}")]
    NotFound { id: String },

    /// Backend rejected the call for quota reasons
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Backend returned an error response
    #[error("store API error: {message}")]
    Api { message: String },

    /// Call never completed (connection failure, timeout)
    #[error("store transport error: {message}")]
    Transport { message: String },
}

/// Errors surfaced by [`Synchronizer::sync`](crate::Synchronizer::sync).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("destination not found: {id}")]
    DestinationNotFound { id: String },

    #[error("destination rate limited: {message}")]
    RateLimited { message: String },

    /// A write failed part-way; the tab may hold partial data
    #[error("write to destination failed: {message}")]
    TransientWriteFailure { message: String },
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => SyncError::DestinationNotFound { id },
            StoreError::RateLimited { message } => SyncError::RateLimited { message },
            StoreError::Api { message } | StoreError::Transport { message } => {
                SyncError::TransientWriteFailure { message }
            }
        }
    }
}

/// Unknown sync policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sync policy '{0}' (expected 'clear-and-rewrite' or 'append-preserving')")]
pub struct ParsePolicyError(pub String);

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type Result<T> = std::result::Result<T, SyncError>;
