//! In-memory tabular store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{Destination, Row, TabHandle, TabularStore};

#[derive(Debug, Clone)]
struct TabData {
    id: i64,
    name: String,
    row_count: usize,
    col_count: usize,
    cells: Vec<Row>,
}

impl TabData {
    fn populated_rows(&self) -> usize {
        self.cells
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map_or(0, |last| last + 1)
    }

    fn handle(&self) -> TabHandle {
        TabHandle {
            id: self.id,
            name: self.name.clone(),
            row_count: self.row_count,
            col_count: self.col_count,
            populated_rows: self.populated_rows(),
        }
    }

    fn write(&mut self, start_row: usize, rows: &[Row]) {
        let end = start_row + rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        self.row_count = self.row_count.max(end);
        self.col_count = self.col_count.max(width);

        if self.cells.len() < end {
            self.cells.resize(end, Vec::new());
        }
        for (offset, row) in rows.iter().enumerate() {
            let target = &mut self.cells[start_row + offset];
            if target.len() < row.len() {
                target.resize(row.len(), String::new());
            }
            target[..row.len()].clone_from_slice(row);
        }
    }
}

#[derive(Debug, Default)]
struct DestinationData {
    tabs: Vec<TabData>,
}

#[derive(Debug, Default)]
struct Calls {
    create_tab: usize,
    write_range: usize,
    clear: usize,
    replace_rows: usize,
}

#[derive(Debug)]
struct State {
    destinations: HashMap<String, DestinationData>,
    next_tab_id: i64,
    batch_writes: bool,
    write_failure: Option<StoreError>,
    calls: Calls,
}

/// In-memory [`TabularStore`].
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// inspection after giving one to the synchronizer.
#[derive(Clone)]
pub struct MemoryTabularStore {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryTabularStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTabularStore {
    /// Create a store with no destinations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                destinations: HashMap::new(),
                next_tab_id: 1,
                batch_writes: true,
                write_failure: None,
                calls: Calls::default(),
            })),
        }
    }

    /// Add an empty destination.
    pub fn with_destination(self, id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .destinations
            .entry(id.to_string())
            .or_default();
        self
    }

    /// Add a tab with initial contents, creating the destination if needed.
    pub fn with_tab(self, destination_id: &str, name: &str, rows: Vec<Row>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_tab_id;
            state.next_tab_id += 1;

            let mut tab = TabData {
                id,
                name: name.to_string(),
                row_count: 0,
                col_count: 0,
                cells: Vec::new(),
            };
            tab.write(0, &rows);

            state
                .destinations
                .entry(destination_id.to_string())
                .or_default()
                .tabs
                .push(tab);
        }
        self
    }

    /// Make destinations accept one row per write.
    pub fn without_batch_writes(self) -> Self {
        self.state.lock().unwrap().batch_writes = false;
        self
    }

    /// Fail every mutating call with `error` until cleared.
    pub fn fail_writes_with(&self, error: StoreError) {
        self.state.lock().unwrap().write_failure = Some(error);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().write_failure = None;
    }

    /// Populated rows of a tab, or `None` if the tab does not exist.
    ///
    /// Trailing empty cells are dropped, as the Sheets values API does.
    pub fn rows(&self, destination_id: &str, tab_name: &str) -> Option<Vec<Row>> {
        let state = self.state.lock().unwrap();
        let tab = state
            .destinations
            .get(destination_id)?
            .tabs
            .iter()
            .find(|tab| tab.name == tab_name)?;

        Some(
            tab.cells[..tab.populated_rows()]
                .iter()
                .map(|row| {
                    let end = row.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1);
                    row[..end].to_vec()
                })
                .collect(),
        )
    }

    /// Allocated grid size of a tab.
    pub fn grid_size(&self, destination_id: &str, tab_name: &str) -> Option<(usize, usize)> {
        let state = self.state.lock().unwrap();
        state
            .destinations
            .get(destination_id)?
            .tabs
            .iter()
            .find(|tab| tab.name == tab_name)
            .map(|tab| (tab.row_count, tab.col_count))
    }

    pub fn tab_names(&self, destination_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .destinations
            .get(destination_id)
            .map(|d| d.tabs.iter().map(|tab| tab.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn create_tab_calls(&self) -> usize {
        self.state.lock().unwrap().calls.create_tab
    }

    pub fn write_range_calls(&self) -> usize {
        self.state.lock().unwrap().calls.write_range
    }

    pub fn clear_calls(&self) -> usize {
        self.state.lock().unwrap().calls.clear
    }

    pub fn replace_rows_calls(&self) -> usize {
        self.state.lock().unwrap().calls.replace_rows
    }
}

#[async_trait]
impl TabularStore for MemoryTabularStore {
    async fn open(&self, destination_id: &str) -> StoreResult<Box<dyn Destination>> {
        let state = self.state.lock().unwrap();
        if !state.destinations.contains_key(destination_id) {
            return Err(StoreError::NotFound {
                id: destination_id.to_string(),
            });
        }

        Ok(Box::new(MemoryDestination {
            id: destination_id.to_string(),
            batch_writes: state.batch_writes,
            state: self.state.clone(),
        }))
    }
}

struct MemoryDestination {
    id: String,
    batch_writes: bool,
    state: Arc<Mutex<State>>,
}

impl MemoryDestination {
    /// Run `f` against a tab after checking for injected failures.
    fn mutate<T>(&self, tab: &TabHandle, f: impl FnOnce(&mut TabData) -> T) -> StoreResult<T> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.write_failure.clone() {
            return Err(error);
        }

        let data = state
            .destinations
            .get_mut(&self.id)
            .ok_or_else(|| StoreError::NotFound { id: self.id.clone() })?
            .tabs
            .iter_mut()
            .find(|t| t.id == tab.id)
            .ok_or_else(|| StoreError::Api {
                message: format!("tab '{}' no longer exists", tab.name),
            })?;

        Ok(f(data))
    }

    fn find<T>(&self, f: impl FnOnce(&DestinationData) -> T) -> StoreResult<T> {
        let state = self.state.lock().unwrap();
        state
            .destinations
            .get(&self.id)
            .map(f)
            .ok_or_else(|| StoreError::NotFound { id: self.id.clone() })
    }
}

#[async_trait]
impl Destination for MemoryDestination {
    fn id(&self) -> &str {
        &self.id
    }

    async fn tab_names(&self) -> StoreResult<Vec<String>> {
        self.find(|d| d.tabs.iter().map(|tab| tab.name.clone()).collect())
    }

    async fn tab(&self, name: &str) -> StoreResult<Option<TabHandle>> {
        self.find(|d| d.tabs.iter().find(|tab| tab.name == name).map(TabData::handle))
    }

    async fn create_tab(&self, name: &str, rows: usize, cols: usize) -> StoreResult<TabHandle> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_tab += 1;
        if let Some(error) = state.write_failure.clone() {
            return Err(error);
        }

        let id = state.next_tab_id;
        state.next_tab_id += 1;

        let destination = state
            .destinations
            .get_mut(&self.id)
            .ok_or_else(|| StoreError::NotFound { id: self.id.clone() })?;
        if destination.tabs.iter().any(|tab| tab.name == name) {
            return Err(StoreError::Api {
                message: format!("a tab named '{name}' already exists"),
            });
        }

        let tab = TabData {
            id,
            name: name.to_string(),
            row_count: rows,
            col_count: cols,
            cells: Vec::new(),
        };
        let handle = tab.handle();
        destination.tabs.push(tab);
        Ok(handle)
    }

    async fn read_header(&self, tab: &TabHandle) -> StoreResult<Row> {
        self.find(|d| {
            let mut header = d
                .tabs
                .iter()
                .find(|t| t.id == tab.id)
                .and_then(|t| t.cells.first().cloned())
                .unwrap_or_default();
            while header.last().is_some_and(|cell| cell.is_empty()) {
                header.pop();
            }
            header
        })
    }

    async fn write_range(&self, tab: &TabHandle, start_row: usize, rows: &[Row]) -> StoreResult<()> {
        self.state.lock().unwrap().calls.write_range += 1;
        if !self.batch_writes && rows.len() > 1 {
            return Err(StoreError::Api {
                message: "batch writes are not supported".to_string(),
            });
        }
        self.mutate(tab, |data| data.write(start_row, rows))
    }

    async fn clear(&self, tab: &TabHandle) -> StoreResult<()> {
        self.state.lock().unwrap().calls.clear += 1;
        self.mutate(tab, |data| data.cells.clear())
    }

    async fn replace_rows(&self, tab: &TabHandle, rows: &[Row]) -> StoreResult<()> {
        self.state.lock().unwrap().calls.replace_rows += 1;
        self.mutate(tab, |data| {
            data.cells.clear();
            data.write(0, rows);
        })
    }

    fn supports_batch_writes(&self) -> bool {
        self.batch_writes
    }
}
