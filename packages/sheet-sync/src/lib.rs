//! Post Synchronization
//!
//! Writes a batch of [`PostRecord`]s into one named tab of a tabular
//! destination (a Google spreadsheet in production), keeping the header row
//! `Title, Body, Date, URL` in place.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sheet_sync::{MemoryTabularStore, SyncConfig, Synchronizer};
//!
//! let store = MemoryTabularStore::new().with_destination("sheet-1");
//! let synchronizer = Synchronizer::new(Arc::new(store), SyncConfig::default());
//!
//! let outcome = synchronizer.sync("sheet-1", &records).await?;
//! assert_eq!(outcome.written, records.len());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Store capability traits (`TabularStore`, `Destination`)
//! - [`sync`] - Reconciliation policies and the `Synchronizer`
//! - [`stores`] - In-memory and Google Sheets backends

pub mod error;
pub mod stores;
pub mod sync;
pub mod traits;

pub use error::{ParsePolicyError, Result, StoreError, StoreResult, SyncError};
pub use stores::MemoryTabularStore;
#[cfg(feature = "sheets")]
pub use stores::SheetsTabularStore;
pub use sync::{
    header_row, record_row, SyncConfig, SyncOutcome, SyncPolicy, Synchronizer, HEADER,
};
pub use traits::store::{Destination, Row, TabHandle, TabState, TabularStore};

pub use post_extraction::PostRecord;
