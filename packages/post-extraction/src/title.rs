//! Title resolution as an ordered chain of strategies.

use std::collections::HashMap;

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};

use crate::text::visible_text;

/// One way of locating a title element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleStrategy {
    /// First element with this tag name
    Heading(&'static str),
    /// First element whose `class` attribute contains this marker
    ClassContains(&'static str),
}

/// Title chain for a post container.
pub const CONTAINER_TITLE_CHAIN: &[TitleStrategy] = &[
    TitleStrategy::Heading("h2"),
    TitleStrategy::Heading("h1"),
    TitleStrategy::Heading("h3"),
    TitleStrategy::Heading("h4"),
    TitleStrategy::ClassContains("title"),
];

/// Title chain for the whole-page fallback.
pub const PAGE_TITLE_CHAIN: &[TitleStrategy] =
    &[TitleStrategy::Heading("h1"), TitleStrategy::Heading("h2")];

lazy_static! {
    static ref CHAIN_SELECTORS: HashMap<TitleStrategy, Selector> = CONTAINER_TITLE_CHAIN
        .iter()
        .chain(PAGE_TITLE_CHAIN)
        .map(|strategy| (*strategy, strategy.parse_selector()))
        .collect();
}

/// A located title element and its normalized text.
#[derive(Debug, Clone)]
pub struct TitleMatch<'a> {
    pub element: ElementRef<'a>,
    pub text: String,
}

impl TitleStrategy {
    fn css(self) -> String {
        match self {
            TitleStrategy::Heading(tag) => tag.to_string(),
            TitleStrategy::ClassContains(marker) => format!("[class*=\"{}\"]", marker),
        }
    }

    fn parse_selector(self) -> Selector {
        Selector::parse(&self.css()).expect("Failed to parse title selector - this is a bug")
    }

    /// First descendant of `scope` matching this strategy with non-blank text.
    pub fn find<'a>(self, scope: ElementRef<'a>) -> Option<TitleMatch<'a>> {
        let parsed;
        let selector = match CHAIN_SELECTORS.get(&self) {
            Some(selector) => selector,
            None => {
                parsed = self.parse_selector();
                &parsed
            }
        };

        scope.select(selector).find_map(|element| {
            let text = visible_text(element);
            (!text.is_empty()).then_some(TitleMatch { element, text })
        })
    }
}

/// Try each strategy in order; the first match wins.
pub fn resolve_title<'a>(chain: &[TitleStrategy], scope: ElementRef<'a>) -> Option<TitleMatch<'a>> {
    chain.iter().find_map(|strategy| strategy.find(scope))
}

/// Placeholder for a post without a recognizable title. `ordinal` is 1-based.
pub fn placeholder_title(ordinal: usize) -> String {
    format!("Untitled post {}", ordinal)
}
