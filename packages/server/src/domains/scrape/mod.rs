//! Scrape domain - fetch a blog page, extract its posts, sync them to a tab.

pub mod actions;
pub mod models;

pub use actions::{run_scrape, ScrapeOutcome};
pub use models::{ScrapeRequest, ScrapeResponse, ValidScrapeRequest};
