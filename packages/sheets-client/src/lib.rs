//! Pure Google Sheets v4 REST API client.
//!
//! A minimal client covering the calls needed to manage one tab of a
//! spreadsheet: listing tabs, adding and resizing them, and reading,
//! writing and clearing cell values.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheets_client::{ServiceAccountKey, SheetsClient};
//!
//! let key = ServiceAccountKey::from_file("service.json")?;
//! let client = SheetsClient::with_service_account(key, Duration::from_secs(30))?;
//!
//! for sheet in client.get_sheets("1AbC...").await? {
//!     println!("{}", sheet.title);
//! }
//! ```

pub mod a1;
pub mod auth;
pub mod error;
pub mod types;

pub use auth::{AccessTokenSource, ServiceAccountKey, StaticToken, TokenProvider};
pub use error::{Result, SheetsError};
pub use types::{
    AddSheetRequest, AppendDimensionRequest, BatchUpdateRequest, BatchUpdateResponse, Dimension,
    GridProperties, Request, SheetProperties, UpdateCellsRequest, UpdateValuesResponse, ValueRange,
};

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use types::Spreadsheet;

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsClient {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokenSource>,
    base_url: String,
}

impl SheetsClient {
    /// Build a client whose requests time out after `timeout`.
    pub fn new(tokens: Arc<dyn AccessTokenSource>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            tokens,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Authenticate as a service account.
    pub fn with_service_account(key: ServiceAccountKey, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let tokens = TokenProvider::new(key, http.clone())?;
        Ok(Self {
            client: http,
            tokens: Arc::new(tokens),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(spreadsheet_id))
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let token = self.tokens.access_token().await?;
        let resp = request.bearer_auth(token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsError::from_response(status.as_u16(), &body));
        }

        resp.json()
            .await
            .map_err(|e| SheetsError::Parse(e.to_string()))
    }

    /// Properties of every tab in a spreadsheet.
    pub async fn get_sheets(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        let request = self
            .client
            .get(self.spreadsheet_url(spreadsheet_id))
            .query(&[("fields", "sheets.properties")]);

        let spreadsheet: Spreadsheet = self.send(request).await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .collect())
    }

    /// Apply structural edits atomically.
    pub async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Request>,
    ) -> Result<BatchUpdateResponse> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url(spreadsheet_id));
        tracing::debug!(spreadsheet_id, requests = requests.len(), "Sheets batch update");

        let request = self
            .client
            .post(url)
            .json(&BatchUpdateRequest { requests });
        self.send(request).await
    }

    /// Add a tab and return its properties.
    pub async fn add_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        grid: GridProperties,
    ) -> Result<SheetProperties> {
        let response = self
            .batch_update(
                spreadsheet_id,
                vec![Request::AddSheet(AddSheetRequest {
                    properties: SheetProperties {
                        sheet_id: None,
                        title: title.to_string(),
                        grid_properties: Some(grid),
                    },
                })],
            )
            .await?;

        response
            .replies
            .into_iter()
            .find_map(|reply| reply.add_sheet)
            .map(|reply| reply.properties)
            .ok_or_else(|| SheetsError::Parse("addSheet reply missing".to_string()))
    }

    /// Read values in `range` (A1 notation).
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange> {
        let request = self
            .client
            .get(self.values_url(spreadsheet_id, range))
            .query(&[("majorDimension", "ROWS")]);
        self.send(request).await
    }

    /// Overwrite values in `range` with literal strings.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<UpdateValuesResponse> {
        let request = self
            .client
            .put(self.values_url(spreadsheet_id, range))
            .query(&[("valueInputOption", "RAW")])
            .json(&ValueRange::rows(range, rows));
        self.send(request).await
    }

    /// Clear values in `range`, keeping formatting.
    pub async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        let url = format!("{}:clear", self.values_url(spreadsheet_id, range));
        let request = self.client.post(url).json(&serde_json::json!({}));
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }
}
