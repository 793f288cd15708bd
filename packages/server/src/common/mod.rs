// Common types and utilities shared across domains

pub mod errors;

pub use errors::{ApiError, ErrorBody};
