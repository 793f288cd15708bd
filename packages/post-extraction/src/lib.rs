//! Heuristic blog post extraction.
//!
//! Turns a fetched HTML page into an ordered list of [`PostRecord`]s without
//! relying on any site-specific markup.
//!
//! # Strategy
//!
//! - **Multi-post path**: every outermost `<article>` (or `role="article"`)
//!   element is one post. Title, body text, and permalink are located inside
//!   each container.
//! - **Single-post fallback**: pages without post containers become exactly
//!   one record built from the page heading and its main content region.
//!
//! Extraction never fails because markup is missing. The only error is
//! [`ExtractionError::Unparseable`], raised when the response body is not a
//! text document at all.
//!
//! # Usage
//!
//! ```rust,ignore
//! use post_extraction::{Document, ExtractorConfig, Limit, PostExtractor};
//!
//! let extractor = PostExtractor::new(ExtractorConfig::default());
//! let document = Document::parse(&body_bytes, page_url)?;
//! let result = extractor.extract(&document, Limit::from_request(Some(10)));
//! for post in result.iter() {
//!     println!("{} -> {}", post.title, post.source_url);
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod links;
pub mod text;
pub mod title;
pub mod types;

pub use config::{ExtractorConfig, DEFAULT_MAX_BODY_CHARS};
pub use document::Document;
pub use error::{ExtractionError, Result};
pub use extractor::PostExtractor;
pub use title::{TitleStrategy, CONTAINER_TITLE_CHAIN, PAGE_TITLE_CHAIN};
pub use types::{ExtractionPath, ExtractionResult, Limit, PostRecord};
