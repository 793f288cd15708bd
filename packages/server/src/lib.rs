// Blog Scrape Server - API Core
//
// Fetches a blog page, extracts its posts, and writes them to a tab of a
// Google spreadsheet. The HTTP surface is a single `/scrape` route.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
