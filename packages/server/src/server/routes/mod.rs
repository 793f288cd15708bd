// HTTP routes
pub mod health;
pub mod scrape;

pub use health::*;
pub use scrape::*;
