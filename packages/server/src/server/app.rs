//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::Extension,
    routing::{get, post},
    BoxError, Router,
};
use tower::timeout::error::Elapsed;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::common::ApiError;
use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, scrape_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub server_deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// Requests running longer than `request_timeout` are cut off with a JSON
/// error. The handler future is dropped, so no further pipeline stage runs.
pub fn build_app(server_deps: ServerDeps, request_timeout: Duration) -> Router {
    let app_state = AppState {
        server_deps: Arc::new(server_deps),
    };

    Router::new()
        .route("/scrape", post(scrape_handler))
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(err, request_timeout)
                }))
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
}

fn middleware_error(err: BoxError, request_timeout: Duration) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::TimedOut(request_timeout)
    } else {
        ApiError::Internal(err.to_string())
    }
}
