//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod page_fetcher;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use page_fetcher::HttpPageFetcher;
pub use traits::*;
