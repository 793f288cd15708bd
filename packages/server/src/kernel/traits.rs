// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (extracting posts, syncing them) lives in the domain actions
// and the library crates; these traits only wrap outside systems.
//
// Naming convention: Base* for trait names (e.g., BasePageFetcher)

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

// =============================================================================
// Page Fetcher Trait (Infrastructure - HTTP GET of a web page)
// =============================================================================

/// A fetched page, whatever its status.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: Vec<u8>,
    /// URL after redirects
    pub final_url: Url,
    pub content_type: Option<String>,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// GET `url`, following redirects. Non-2xx responses are returned, not errors.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
