//! Request and response bodies for `/scrape`.

use post_extraction::Limit;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::common::ApiError;

/// Raw `/scrape` body. Fields stay optional so missing ones are reported as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default, alias = "blog_url")]
    pub source_url: Option<String>,
    #[serde(default, alias = "spreadsheet_id")]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidScrapeRequest {
    pub source_url: Url,
    pub destination_id: String,
    pub limit: Limit,
}

impl ScrapeRequest {
    pub fn validate(self) -> Result<ValidScrapeRequest, ApiError> {
        let source_url = self
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::validation("sourceUrl is required"))?;

        let destination_id = self
            .destination_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::validation("destinationId is required"))?
            .to_string();

        Ok(ValidScrapeRequest {
            source_url: normalize_source_url(source_url)?,
            destination_id,
            limit: Limit::from_request(self.limit),
        })
    }
}

/// Parse a user-supplied page URL, assuming `https://` when no scheme is given.
pub fn normalize_source_url(raw: &str) -> Result<Url, ApiError> {
    let parsed = match Url::parse(raw) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}")),
        other => other,
    }
    .map_err(|e| ApiError::validation(format!("sourceUrl is not a valid URL: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::validation(format!(
            "sourceUrl must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ApiError::validation("sourceUrl has no host"));
    }

    Ok(parsed)
}

/// Success body: `{"status": "ok", "count": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub status: String,
    pub count: usize,
}

impl ScrapeResponse {
    pub fn ok(count: usize) -> Self {
        Self {
            status: "ok".to_string(),
            count,
        }
    }
}
