//! Server dependencies for request handlers (using traits for testability)
//!
//! This module provides the dependency container shared by every request.
//! External systems sit behind trait objects so tests can swap in mocks.

use std::sync::Arc;

use post_extraction::PostExtractor;
use sheet_sync::Synchronizer;

use crate::kernel::BasePageFetcher;

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub page_fetcher: Arc<dyn BasePageFetcher>,
    pub extractor: PostExtractor,
    pub synchronizer: Synchronizer,
}

impl ServerDeps {
    pub fn new(
        page_fetcher: Arc<dyn BasePageFetcher>,
        extractor: PostExtractor,
        synchronizer: Synchronizer,
    ) -> Self {
        Self {
            page_fetcher,
            extractor,
            synchronizer,
        }
    }
}
