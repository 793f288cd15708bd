//! Visible-text collection and normalization.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};

/// Elements that never contribute body text.
const NOISE_SELECTOR_STR: &str = "script, style, noscript, nav, form, iframe, template";

/// Elements whose boundaries separate words.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

lazy_static! {
    static ref NOISE_SELECTOR: Selector =
        Selector::parse(NOISE_SELECTOR_STR).expect("Failed to parse noise selector - this is a bug");
}

/// Copy `element` into a standalone fragment with noise elements detached.
///
/// The source document is left untouched.
pub fn without_noise(element: ElementRef<'_>) -> Html {
    let mut copy = Html::parse_fragment(&element.html());

    let noise: Vec<_> = copy.select(&NOISE_SELECTOR).map(|el| el.id()).collect();
    for id in noise {
        if let Some(mut node) = copy.tree.get_mut(id) {
            node.detach();
        }
    }

    copy
}

/// Visible text of `element` with whitespace collapsed to single spaces.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    collapse_whitespace(&raw)
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let is_block = BLOCK_TAGS.contains(&el.name());
                if is_block {
                    out.push(' ');
                }
                push_text(child_element, out);
                if is_block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => s[..cut].trim_end().to_string(),
        None => s.to_string(),
    }
}
