//! Typed errors for post extraction.

use thiserror::Error;

/// Errors that can occur while extracting posts.
///
/// Missing structure is never an error: pages without post containers fall
/// back to a single whole-page record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The response body is not a text document that can be parsed as HTML
    #[error("document could not be parsed: {reason}")]
    Unparseable { reason: String },
}

impl ExtractionError {
    pub(crate) fn unparseable(reason: impl Into<String>) -> Self {
        Self::Unparseable {
            reason: reason.into(),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
