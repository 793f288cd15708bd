//! Storage abstraction the synchronizer writes through.

pub mod store;
