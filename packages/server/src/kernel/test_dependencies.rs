// Test dependencies - mock implementations for testing
//
// Provides mock implementations of all kernel traits for use in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use super::{BasePageFetcher, FetchError, FetchedPage};

// =============================================================================
// Mock Page Fetcher
// =============================================================================

/// Serves canned pages by URL and records every fetch
#[derive(Clone, Default)]
pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, Result<FetchedPage, FetchError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` with status 200 at `url`
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.with_response(url, 200, html.as_bytes())
    }

    /// Serve an arbitrary status and body at `url`
    pub fn with_response(self, url: &str, status: u16, body: &[u8]) -> Self {
        self.add_response(url, status, body);
        self
    }

    /// Register a response on a shared fetcher
    pub fn add_response(&self, url: &str, status: u16, body: &[u8]) {
        let page = FetchedPage {
            status,
            body: body.to_vec(),
            final_url: Url::parse(url).unwrap(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        };
        self.pages.lock().unwrap().insert(url.to_string(), Ok(page));
    }

    /// Answer `url` as if it redirected to `final_url`
    pub fn add_redirect(&self, url: &str, final_url: &str, html: &str) {
        let page = FetchedPage {
            status: 200,
            body: html.as_bytes().to_vec(),
            final_url: Url::parse(final_url).unwrap(),
            content_type: Some("text/html".to_string()),
        };
        self.pages.lock().unwrap().insert(url.to_string(), Ok(page));
    }

    /// Fail fetches of `url` with `error`
    pub fn add_error(&self, url: &str, error: FetchError) {
        self.pages.lock().unwrap().insert(url.to_string(), Err(error));
    }

    /// Wait `delay` before answering every fetch
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// URLs fetched so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        // Record the call
        self.calls.lock().unwrap().push(url.to_string());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.pages
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Transport {
                    url: url.to_string(),
                    message: "no mock response registered".to_string(),
                })
            })
    }
}
