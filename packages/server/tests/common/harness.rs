//! Test harness driving the real router against in-memory collaborators.
//!
//! Each harness owns its own mock fetcher and store, so tests can run in
//! parallel without sharing state.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use post_extraction::PostExtractor;
use serde_json::Value;
use server_core::kernel::test_dependencies::MockPageFetcher;
use server_core::kernel::ServerDeps;
use server_core::server::build_app;
use sheet_sync::{MemoryTabularStore, SyncConfig, SyncPolicy, Synchronizer};
use test_context::AsyncTestContext;
use tower::ServiceExt;

use super::fixtures::*;

pub struct TestHarness {
    pub app: Router,
    pub fetcher: MockPageFetcher,
    pub store: MemoryTabularStore,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new(SyncPolicy::ClearAndRewrite)
    }
}

impl TestHarness {
    /// Harness with the fixture pages and destinations registered.
    pub fn new(policy: SyncPolicy) -> Self {
        Self::with_request_timeout(policy, Duration::from_secs(5))
    }

    pub fn with_request_timeout(policy: SyncPolicy, request_timeout: Duration) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let fetcher = MockPageFetcher::new()
            .with_page(BLOG_URL, &blog_html())
            .with_page(PAGE_URL, page_html());

        let store = MemoryTabularStore::new()
            .with_destination(EMPTY_SHEET)
            .with_tab(STALE_SHEET, "Source", stale_rows());

        let deps = ServerDeps::new(
            Arc::new(fetcher.clone()),
            PostExtractor::default(),
            Synchronizer::new(
                Arc::new(store.clone()),
                SyncConfig::default().with_policy(policy),
            ),
        );

        Self {
            app: build_app(deps, request_timeout),
            fetcher,
            store,
        }
    }

    /// Send a request and decode the JSON response body.
    pub async fn request(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// `POST /scrape` with a JSON body.
    pub async fn scrape(&self, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/scrape", Body::from(body.to_string()))
            .await
    }

    /// Rows of the "Source" tab of `destination`.
    pub fn rows(&self, destination: &str) -> Option<Vec<Vec<String>>> {
        self.store.rows(destination, "Source")
    }
}
