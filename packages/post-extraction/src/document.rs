//! Parsed page wrapper.

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{ExtractionError, Result};
use crate::links::is_web_url;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

lazy_static! {
    static ref BASE_SELECTOR: Selector =
        Selector::parse("base[href]").expect("Failed to parse base selector - this is a bug");
}

/// An HTML page together with the URLs needed to resolve its links.
///
/// Not `Send`: parse, extract, and drop it before the next `.await`.
pub struct Document {
    html: Html,
    page_url: Url,
    base_url: Url,
}

impl Document {
    /// Parse a raw response body.
    ///
    /// The HTML5 parser recovers from any malformed markup, so the only
    /// rejected inputs are bodies that are not text: invalid UTF-8 or
    /// embedded NUL bytes.
    pub fn parse(bytes: &[u8], page_url: Url) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let source = std::str::from_utf8(bytes).map_err(|e| {
            ExtractionError::unparseable(format!("body is not valid UTF-8: {}", e))
        })?;

        if source.contains('\0') {
            return Err(ExtractionError::unparseable("body contains NUL bytes"));
        }

        Ok(Self::from_html(source, page_url))
    }

    /// Parse an already-decoded HTML string.
    pub fn from_html(source: &str, page_url: Url) -> Self {
        let html = Html::parse_document(source);
        let base_url = declared_base(&html, &page_url).unwrap_or_else(|| page_url.clone());

        Self {
            html,
            page_url,
            base_url,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// URL the page was fetched from (after redirects).
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// URL relative links resolve against: `<base href>` when present,
    /// otherwise the page URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn declared_base(html: &Html, page_url: &Url) -> Option<Url> {
    let href = html
        .select(&BASE_SELECTOR)
        .next()?
        .value()
        .attr("href")?
        .trim();

    page_url.join(href).ok().filter(is_web_url)
}
