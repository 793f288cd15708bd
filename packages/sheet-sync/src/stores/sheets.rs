//! Google Sheets backend.
//!
//! A destination is a spreadsheet id; tabs are its sheets.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sheets_client::{
    a1, AppendDimensionRequest, Dimension, GridProperties, Request, SheetProperties, SheetsClient,
    SheetsError, UpdateCellsRequest,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{Destination, Row, TabHandle, TabularStore};

/// [`TabularStore`] over the Sheets v4 API.
pub struct SheetsTabularStore {
    client: Arc<SheetsClient>,
}

impl SheetsTabularStore {
    pub fn new(client: Arc<SheetsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TabularStore for SheetsTabularStore {
    async fn open(&self, destination_id: &str) -> StoreResult<Box<dyn Destination>> {
        let sheets = match self.client.get_sheets(destination_id).await {
            Ok(sheets) => sheets,
            // Unshared spreadsheets answer 403; to us they do not exist.
            Err(SheetsError::NotFound(_)) | Err(SheetsError::Api { status: 403, .. }) => {
                return Err(StoreError::NotFound {
                    id: destination_id.to_string(),
                })
            }
            Err(e) => return Err(store_error(e, destination_id)),
        };

        debug!(destination_id, tabs = sheets.len(), "Opened spreadsheet");

        Ok(Box::new(SheetsDestination {
            id: destination_id.to_string(),
            client: self.client.clone(),
            sheets: Mutex::new(sheets),
            grids: Mutex::new(HashMap::new()),
        }))
    }
}

fn store_error(err: SheetsError, destination_id: &str) -> StoreError {
    match err {
        SheetsError::NotFound(_) => StoreError::NotFound {
            id: destination_id.to_string(),
        },
        SheetsError::RateLimited(message) => StoreError::RateLimited { message },
        SheetsError::Network(e) => StoreError::Transport {
            message: e.to_string(),
        },
        other => StoreError::Api {
            message: other.to_string(),
        },
    }
}

struct SheetsDestination {
    id: String,
    client: Arc<SheetsClient>,
    sheets: Mutex<Vec<SheetProperties>>,
    /// Grid sizes after growth performed through this handle.
    grids: Mutex<HashMap<i64, GridProperties>>,
}

impl SheetsDestination {
    fn err(&self, err: SheetsError) -> StoreError {
        store_error(err, &self.id)
    }

    async fn grid(&self, tab: &TabHandle) -> GridProperties {
        self.grids
            .lock()
            .await
            .get(&tab.id)
            .copied()
            .unwrap_or(GridProperties {
                row_count: tab.row_count as i64,
                column_count: tab.col_count as i64,
            })
    }

    /// Requests that grow the grid to hold `rows` x `cols`, if needed.
    async fn growth(&self, tab: &TabHandle, rows: usize, cols: usize) -> (Vec<Request>, GridProperties) {
        growth_requests(tab.id, self.grid(tab).await, rows, cols)
    }

    async fn remember_grid(&self, tab: &TabHandle, grid: GridProperties) {
        self.grids.lock().await.insert(tab.id, grid);
    }

    async fn populated_rows(&self, title: &str, cols: usize) -> StoreResult<usize> {
        let range = self
            .client
            .get_values(&self.id, &a1::rows_from(title, 0, cols))
            .await
            .map_err(|e| self.err(e))?;

        Ok(range
            .string_rows()
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map_or(0, |last| last + 1))
    }
}

/// `appendDimension` requests taking `current` to at least `rows` x `cols`,
/// and the resulting grid size.
fn growth_requests(
    sheet_id: i64,
    current: GridProperties,
    rows: usize,
    cols: usize,
) -> (Vec<Request>, GridProperties) {
    let mut requests = Vec::new();
    let mut grown = current;

    if rows as i64 > current.row_count {
        requests.push(Request::AppendDimension(AppendDimensionRequest {
            sheet_id,
            dimension: Dimension::Rows,
            length: rows as i64 - current.row_count,
        }));
        grown.row_count = rows as i64;
    }
    if cols as i64 > current.column_count {
        requests.push(Request::AppendDimension(AppendDimensionRequest {
            sheet_id,
            dimension: Dimension::Columns,
            length: cols as i64 - current.column_count,
        }));
        grown.column_count = cols as i64;
    }

    (requests, grown)
}

/// One `batchUpdate` body replacing a sheet's contents: growth, then a full
/// clear, then the new rows from A1.
fn replace_requests(sheet_id: i64, current: GridProperties, rows: &[Row]) -> (Vec<Request>, GridProperties) {
    let (mut requests, grown) = growth_requests(sheet_id, current, rows.len(), row_width(rows));
    requests.push(Request::UpdateCells(UpdateCellsRequest::clear_sheet(sheet_id)));
    if !rows.is_empty() {
        requests.push(Request::UpdateCells(UpdateCellsRequest::write_strings(
            sheet_id, 0, rows,
        )));
    }
    (requests, grown)
}

fn row_width(rows: &[Row]) -> usize {
    rows.iter().map(Vec::len).max().unwrap_or(0)
}

#[async_trait]
impl Destination for SheetsDestination {
    fn id(&self) -> &str {
        &self.id
    }

    async fn tab_names(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .sheets
            .lock()
            .await
            .iter()
            .map(|sheet| sheet.title.clone())
            .collect())
    }

    async fn tab(&self, name: &str) -> StoreResult<Option<TabHandle>> {
        let props = self
            .sheets
            .lock()
            .await
            .iter()
            .find(|sheet| sheet.title == name)
            .cloned();

        let Some(props) = props else {
            return Ok(None);
        };

        let grid = props.grid_properties.unwrap_or_default();
        let col_count = grid.column_count.max(0) as usize;
        let populated_rows = self.populated_rows(&props.title, col_count.max(1)).await?;

        Ok(Some(TabHandle {
            id: props.sheet_id.unwrap_or_default(),
            name: props.title,
            row_count: grid.row_count.max(0) as usize,
            col_count,
            populated_rows,
        }))
    }

    async fn create_tab(&self, name: &str, rows: usize, cols: usize) -> StoreResult<TabHandle> {
        let grid = GridProperties {
            row_count: rows as i64,
            column_count: cols as i64,
        };
        let props = self
            .client
            .add_sheet(&self.id, name, grid)
            .await
            .map_err(|e| self.err(e))?;

        debug!(destination_id = %self.id, tab = %name, rows, cols, "Created tab");

        let handle = TabHandle {
            id: props.sheet_id.unwrap_or_default(),
            name: props.title.clone(),
            row_count: rows,
            col_count: cols,
            populated_rows: 0,
        };
        self.sheets.lock().await.push(props);
        Ok(handle)
    }

    async fn read_header(&self, tab: &TabHandle) -> StoreResult<Row> {
        let range = self
            .client
            .get_values(&self.id, &a1::row(&tab.name, 0, tab.col_count.max(1)))
            .await
            .map_err(|e| self.err(e))?;

        let mut header = range.string_rows().into_iter().next().unwrap_or_default();
        while header.last().is_some_and(|cell| cell.is_empty()) {
            header.pop();
        }
        Ok(header)
    }

    async fn write_range(&self, tab: &TabHandle, start_row: usize, rows: &[Row]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let width = row_width(rows);
        let (growth, grown) = self.growth(tab, start_row + rows.len(), width).await;
        if !growth.is_empty() {
            debug!(tab = %tab.name, rows = grown.row_count, cols = grown.column_count, "Growing grid");
            self.client
                .batch_update(&self.id, growth)
                .await
                .map_err(|e| self.err(e))?;
            self.remember_grid(tab, grown).await;
        }

        self.client
            .update_values(&self.id, &a1::rows_from(&tab.name, start_row, width.max(1)), rows)
            .await
            .map_err(|e| self.err(e))?;
        Ok(())
    }

    async fn clear(&self, tab: &TabHandle) -> StoreResult<()> {
        self.client
            .clear_values(&self.id, &a1::whole_sheet(&tab.name))
            .await
            .map_err(|e| self.err(e))
    }

    /// Growth, clear and write go out as one `batchUpdate`, which the API
    /// applies all-or-nothing.
    async fn replace_rows(&self, tab: &TabHandle, rows: &[Row]) -> StoreResult<()> {
        let (requests, grown) = replace_requests(tab.id, self.grid(tab).await, rows);

        self.client
            .batch_update(&self.id, requests)
            .await
            .map_err(|e| self.err(e))?;
        self.remember_grid(tab, grown).await;
        Ok(())
    }
}
