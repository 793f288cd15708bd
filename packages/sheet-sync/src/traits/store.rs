//! Tabular store traits.
//!
//! A store opens destinations (spreadsheets); a destination holds named
//! tabs of string rows. Rows and columns are zero-based.

use async_trait::async_trait;

use crate::error::StoreResult;

/// One row of cell values.
pub type Row = Vec<String>;

/// Snapshot of a tab's identity and extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabHandle {
    /// Backend-specific tab id
    pub id: i64,
    pub name: String,
    /// Allocated grid size
    pub row_count: usize,
    pub col_count: usize,
    /// Index one past the last row that holds any value
    pub populated_rows: usize,
}

impl TabHandle {
    pub fn state(&self) -> TabState {
        if self.populated_rows == 0 {
            TabState::Empty
        } else {
            TabState::WithData
        }
    }
}

/// Lifecycle state of the target tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabState {
    Absent,
    Empty,
    WithData,
}

impl TabState {
    pub fn of(tab: Option<&TabHandle>) -> Self {
        tab.map_or(TabState::Absent, TabHandle::state)
    }
}

/// Opens destinations by id.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Open a destination. Fails with `NotFound` when it does not exist or
    /// is not shared with us.
    async fn open(&self, destination_id: &str) -> StoreResult<Box<dyn Destination>>;
}

/// A single spreadsheet-like destination.
#[async_trait]
pub trait Destination: Send + Sync {
    fn id(&self) -> &str;

    /// Names of all tabs, in tab order.
    async fn tab_names(&self) -> StoreResult<Vec<String>>;

    /// Look up a tab by exact name.
    async fn tab(&self, name: &str) -> StoreResult<Option<TabHandle>>;

    /// Create an empty tab with the given grid size.
    async fn create_tab(&self, name: &str, rows: usize, cols: usize) -> StoreResult<TabHandle>;

    /// Values of row 0, trailing empty cells dropped. Empty when the tab is empty.
    async fn read_header(&self, tab: &TabHandle) -> StoreResult<Row>;

    /// Overwrite rows starting at `start_row`, growing the grid as needed.
    async fn write_range(&self, tab: &TabHandle, start_row: usize, rows: &[Row]) -> StoreResult<()>;

    /// Remove every value on the tab.
    async fn clear(&self, tab: &TabHandle) -> StoreResult<()>;

    /// Replace the tab's contents with `rows`.
    ///
    /// Backends that can do this in a single call should override it so a
    /// failure leaves the previous contents intact.
    async fn replace_rows(&self, tab: &TabHandle, rows: &[Row]) -> StoreResult<()> {
        self.clear(tab).await?;
        self.write_range(tab, 0, rows).await
    }

    /// Whether `write_range` accepts many rows per call.
    fn supports_batch_writes(&self) -> bool {
        true
    }
}
