//! Tabular store implementations.

pub mod memory;
#[cfg(feature = "sheets")]
pub mod sheets;

pub use memory::MemoryTabularStore;
#[cfg(feature = "sheets")]
pub use sheets::SheetsTabularStore;
