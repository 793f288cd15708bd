//! Permalink resolution.

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use url::Url;

lazy_static! {
    static ref ANCHOR_SELECTOR: Selector =
        Selector::parse("a[href]").expect("Failed to parse anchor selector - this is a bug");
}

/// True for http(s) URLs with a non-empty host.
pub fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}

/// Resolve an `href` to an absolute web URL.
///
/// Absolute hrefs are returned verbatim; relative ones are joined onto
/// `base`. Empty, fragment-only, and non-web hrefs (`mailto:`, `tel:`,
/// `javascript:`) yield `None`.
pub fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match Url::parse(href) {
        Ok(absolute) => is_web_url(&absolute).then(|| href.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(href)
            .ok()
            .filter(is_web_url)
            .map(|url| url.to_string()),
        Err(_) => None,
    }
}

/// Permalink of a post container.
///
/// The title's own link wins (the title is an anchor, wraps one, or sits
/// inside one); otherwise the first usable anchor in the container.
pub fn post_link(container: ElementRef<'_>, title: Option<ElementRef<'_>>, base: &Url) -> Option<String> {
    title
        .and_then(|title| title_link(title, container, base))
        .or_else(|| first_link(container, base))
}

fn title_link(title: ElementRef<'_>, container: ElementRef<'_>, base: &Url) -> Option<String> {
    if let Some(url) = anchor_target(title, base) {
        return Some(url);
    }

    if let Some(url) = first_link(title, base) {
        return Some(url);
    }

    title
        .ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(ElementRef::wrap)
        .find_map(|ancestor| anchor_target(ancestor, base))
}

fn anchor_target(element: ElementRef<'_>, base: &Url) -> Option<String> {
    if element.value().name() != "a" {
        return None;
    }
    resolve_href(element.value().attr("href")?, base)
}

fn first_link(scope: ElementRef<'_>, base: &Url) -> Option<String> {
    scope
        .select(&ANCHOR_SELECTOR)
        .find_map(|anchor| resolve_href(anchor.value().attr("href")?, base))
}
