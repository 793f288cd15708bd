//! Error types for the Sheets client.

use serde::Deserialize;
use thiserror::Error;

/// Result type for Sheets client operations.
pub type Result<T> = std::result::Result<T, SheetsError>;

/// Sheets client errors.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Configuration error (unreadable key file, malformed private key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token exchange failed or the token was rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Spreadsheet or range does not exist (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Quota exhausted (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Unexpected response shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SheetsError {
    /// Classify a non-2xx response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = google_error_message(body).unwrap_or_else(|| body.trim().to_string());
        match status {
            401 => SheetsError::Auth(message),
            404 => SheetsError::NotFound(message),
            429 => SheetsError::RateLimited(message),
            _ => SheetsError::Api { status, message },
        }
    }
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

/// Pull `error.message` out of a Google API error body.
fn google_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GoogleErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}
