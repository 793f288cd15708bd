// Business domains
pub mod scrape;
