//! Post extraction over a parsed [`Document`].

use std::collections::HashSet;

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::error::Result;
use crate::links::post_link;
use crate::text::{truncate_chars, visible_text, without_noise};
use crate::title::{placeholder_title, resolve_title, CONTAINER_TITLE_CHAIN, PAGE_TITLE_CHAIN};
use crate::types::{ExtractionPath, ExtractionResult, Limit, PostRecord};

const CONTAINER_SELECTOR_STR: &str = r#"article, [role="article"]"#;
const MAIN_SELECTOR_STR: &str = r#"main, [role="main"]"#;
const CONTENT_SELECTOR_STR: &str = r#"[class*="content"]"#;

lazy_static! {
    static ref CONTAINER_SELECTOR: Selector = Selector::parse(CONTAINER_SELECTOR_STR)
        .expect("Failed to parse container selector - this is a bug");
    static ref MAIN_SELECTOR: Selector =
        Selector::parse(MAIN_SELECTOR_STR).expect("Failed to parse main selector - this is a bug");
    static ref CONTENT_SELECTOR: Selector = Selector::parse(CONTENT_SELECTOR_STR)
        .expect("Failed to parse content selector - this is a bug");
    static ref BODY_SELECTOR: Selector =
        Selector::parse("body").expect("Failed to parse body selector - this is a bug");
}

/// Extracts post records from HTML pages.
///
/// Stateless apart from its configuration; one instance serves every request.
#[derive(Debug, Clone, Default)]
pub struct PostExtractor {
    config: ExtractorConfig,
}

impl PostExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse `bytes` and extract in one step.
    pub fn extract_bytes(&self, bytes: &[u8], page_url: Url, limit: Limit) -> Result<ExtractionResult> {
        let document = Document::parse(bytes, page_url)?;
        Ok(self.extract(&document, limit))
    }

    /// Extract posts in document order.
    ///
    /// With post containers present, at most `limit` records are produced.
    /// Without them the whole page becomes exactly one record and `limit`
    /// does not apply.
    pub fn extract(&self, document: &Document, limit: Limit) -> ExtractionResult {
        let containers = post_containers(document.html());

        if containers.is_empty() {
            debug!(url = %document.page_url(), "No post containers, using whole page");
            return ExtractionResult {
                records: vec![self.whole_page_record(document)],
                path: ExtractionPath::WholePage,
            };
        }

        let take = limit.apply(containers.len());
        debug!(
            url = %document.page_url(),
            containers = containers.len(),
            taking = take,
            "Extracting post containers"
        );

        let records = containers
            .into_iter()
            .take(take)
            .enumerate()
            .map(|(index, container)| self.container_record(container, index + 1, document))
            .collect();

        ExtractionResult {
            records,
            path: ExtractionPath::Containers,
        }
    }

    fn container_record(&self, container: ElementRef<'_>, ordinal: usize, document: &Document) -> PostRecord {
        let title = resolve_title(CONTAINER_TITLE_CHAIN, container);

        let source_url = post_link(container, title.as_ref().map(|t| t.element), document.base_url())
            .unwrap_or_else(|| document.page_url().to_string());

        PostRecord {
            title: title
                .map(|t| t.text)
                .unwrap_or_else(|| placeholder_title(ordinal)),
            body: self.body_text(container),
            published_at: String::new(),
            source_url,
        }
    }

    fn whole_page_record(&self, document: &Document) -> PostRecord {
        let html = document.html();

        let title = resolve_title(PAGE_TITLE_CHAIN, html.root_element())
            .map(|t| t.text)
            .unwrap_or_else(|| placeholder_title(1));

        PostRecord {
            title,
            body: self.body_text(content_region(html)),
            published_at: String::new(),
            source_url: document.page_url().to_string(),
        }
    }

    fn body_text(&self, element: ElementRef<'_>) -> String {
        let cleaned = without_noise(element);
        truncate_chars(&visible_text(cleaned.root_element()), self.config.max_body_chars)
    }
}

/// Outermost post containers in document order.
///
/// Containers nested inside another container (comment threads, embedded
/// cards) belong to their parent post.
fn post_containers(html: &Html) -> Vec<ElementRef<'_>> {
    let matched: Vec<ElementRef<'_>> = html.select(&CONTAINER_SELECTOR).collect();
    let ids: HashSet<_> = matched.iter().map(|el| el.id()).collect();

    matched
        .into_iter()
        .filter(|el| !el.ancestors().any(|ancestor| ids.contains(&ancestor.id())))
        .collect()
}

/// Most plausible content region for the whole-page fallback.
fn content_region(html: &Html) -> ElementRef<'_> {
    html.select(&MAIN_SELECTOR)
        .next()
        .or_else(|| html.select(&CONTENT_SELECTOR).next())
        .or_else(|| html.select(&BODY_SELECTOR).next())
        .unwrap_or_else(|| html.root_element())
}
