//! Scrape actions - entry point for the fetch, extract, sync pipeline
//!
//! Called directly from the `/scrape` route. Every stage logs with structured
//! fields so a request can be followed through the pipeline.

use post_extraction::{Document, ExtractionPath};
use sheet_sync::SyncOutcome;
use tracing::{debug, info};

use super::models::ValidScrapeRequest;
use crate::common::ApiError;
use crate::kernel::{FetchError, ServerDeps};

/// What a completed scrape did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub extracted: usize,
    pub path: ExtractionPath,
    pub sync: SyncOutcome,
}

/// Fetch the source page, extract its posts, and sync them to the destination.
pub async fn run_scrape(request: &ValidScrapeRequest, deps: &ServerDeps) -> Result<ScrapeOutcome, ApiError> {
    info!(
        source_url = %request.source_url,
        destination_id = %request.destination_id,
        limit = ?request.limit.get(),
        "Processing scrape request"
    );

    let page = deps.page_fetcher.fetch(&request.source_url).await?;
    if !page.is_success() {
        return Err(FetchError::Status {
            url: request.source_url.to_string(),
            status: page.status,
        }
        .into());
    }

    debug!(
        final_url = %page.final_url,
        content_type = page.content_type.as_deref().unwrap_or("unknown"),
        bytes = page.body.len(),
        "Source page fetched"
    );

    // The parsed document is not Send; it must be gone before the sync await.
    let (records, path) = {
        let document = Document::parse(&page.body, page.final_url.clone())?;
        let result = deps.extractor.extract(&document, request.limit);
        let path = result.path;
        (result.into_records(), path)
    };

    info!(
        source_url = %request.source_url,
        count = records.len(),
        path = ?path,
        "Extracted posts"
    );

    let sync = deps
        .synchronizer
        .sync(&request.destination_id, &records)
        .await?;

    Ok(ScrapeOutcome {
        extracted: records.len(),
        path,
        sync,
    })
}
