use serde::{Deserialize, Serialize};

/// `GET /spreadsheets/{id}` restricted to sheet properties.
#[derive(Debug, Clone, Deserialize)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_properties: Option<GridProperties>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: i64,
    #[serde(default)]
    pub column_count: i64,
}

/// A block of cell values addressed in A1 notation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Absent in responses when the range holds no values.
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// Row-major string rows for a write.
    pub fn rows(range: impl Into<String>, rows: &[Vec<String>]) -> Self {
        Self {
            range: Some(range.into()),
            major_dimension: Some("ROWS".to_string()),
            values: rows
                .iter()
                .map(|row| row.iter().cloned().map(serde_json::Value::String).collect())
                .collect(),
        }
    }

    /// Cell values rendered as strings; non-string cells are stringified.
    pub fn string_rows(&self) -> Vec<Vec<String>> {
        self.values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        serde_json::Value::String(s) => s.clone(),
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_rows: i64,
    #[serde(default)]
    pub updated_cells: i64,
}

/// Body of `spreadsheets.batchUpdate`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

/// One structural edit inside a batch update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    AddSheet(AddSheetRequest),
    AppendDimension(AppendDimensionRequest),
    UpdateCells(UpdateCellsRequest),
}

#[derive(Debug, Clone, Serialize)]
pub struct AddSheetRequest {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendDimensionRequest {
    pub sheet_id: i64,
    pub dimension: Dimension,
    pub length: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Rows,
    Columns,
}

/// Writes (or, with no rows and a `range`, clears) cell contents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<GridRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<GridCoordinate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<RowData>,
    pub fields: String,
}

impl UpdateCellsRequest {
    /// Clear every value on a sheet.
    pub fn clear_sheet(sheet_id: i64) -> Self {
        Self {
            range: Some(GridRange { sheet_id }),
            start: None,
            rows: Vec::new(),
            fields: "userEnteredValue".to_string(),
        }
    }

    /// Write string rows starting at `(row_index, 0)`.
    pub fn write_strings(sheet_id: i64, row_index: i64, rows: &[Vec<String>]) -> Self {
        Self {
            range: None,
            start: Some(GridCoordinate {
                sheet_id,
                row_index,
                column_index: 0,
            }),
            rows: rows.iter().map(|row| RowData::strings(row)).collect(),
            fields: "userEnteredValue".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCoordinate {
    pub sheet_id: i64,
    pub row_index: i64,
    pub column_index: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowData {
    pub values: Vec<CellData>,
}

impl RowData {
    pub fn strings(cells: &[String]) -> Self {
        Self {
            values: cells
                .iter()
                .map(|cell| CellData {
                    user_entered_value: ExtendedValue {
                        string_value: cell.clone(),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub user_entered_value: ExtendedValue,
}

/// Stored as a literal string, never parsed as a formula or number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedValue {
    pub string_value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(default)]
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSheetReply {
    pub properties: SheetProperties,
}
