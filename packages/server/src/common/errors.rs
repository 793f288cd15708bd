//! API error type and its JSON rendering.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use post_extraction::ExtractionError;
use serde::{Deserialize, Serialize};
use sheet_sync::SyncError;
use thiserror::Error;

use crate::kernel::FetchError;

/// Everything a request can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request parameters
    #[error("{0}")]
    Validation(String),

    /// Source page could not be fetched or answered non-2xx
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The whole request ran past its deadline
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    #[error("{0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ApiError::Extraction(_)
            | ApiError::Sync(_)
            | ApiError::TimedOut(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "invalid_request",
            ApiError::Fetch(_) => "fetch_failed",
            ApiError::Extraction(ExtractionError::Unparseable { .. }) => "unparseable_document",
            ApiError::Sync(SyncError::DestinationNotFound { .. }) => "destination_not_found",
            ApiError::Sync(SyncError::RateLimited { .. }) => "destination_rate_limited",
            ApiError::Sync(SyncError::TransientWriteFailure { .. }) => "destination_write_failed",
            ApiError::TimedOut(_) => "request_timeout",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::warn!(error = %self, code = self.code(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.code().to_string(),
            detail: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
