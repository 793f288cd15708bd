//! Reconciles a destination tab with a batch of extracted posts.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use post_extraction::PostRecord;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ParsePolicyError, Result};
use crate::traits::store::{Destination, Row, TabHandle, TabState, TabularStore};

/// Column layout of the destination tab.
pub const HEADER: [&str; 4] = ["Title", "Body", "Date", "URL"];

pub const DEFAULT_TAB_NAME: &str = "Source";
pub const DEFAULT_INITIAL_ROWS: usize = 1000;
pub const DEFAULT_INITIAL_COLS: usize = 10;

pub fn header_row() -> Row {
    HEADER.iter().map(|cell| cell.to_string()).collect()
}

/// Cells for one record, in [`HEADER`] order.
pub fn record_row(record: &PostRecord) -> Row {
    vec![
        record.title.clone(),
        record.body.clone(),
        record.published_at.clone(),
        record.source_url.clone(),
    ]
}

/// How existing rows below the header are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Tab ends up holding exactly the header plus this batch.
    #[default]
    ClearAndRewrite,
    /// Existing rows are kept; the batch is appended after them.
    AppendPreserving,
}

impl FromStr for SyncPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" | "clear-and-rewrite" => Ok(SyncPolicy::ClearAndRewrite),
            "append" | "append-preserving" => Ok(SyncPolicy::AppendPreserving),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPolicy::ClearAndRewrite => f.write_str("clear-and-rewrite"),
            SyncPolicy::AppendPreserving => f.write_str("append-preserving"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub tab_name: String,
    /// Grid size of a newly created tab.
    pub initial_rows: usize,
    pub initial_cols: usize,
    pub policy: SyncPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tab_name: DEFAULT_TAB_NAME.to_string(),
            initial_rows: DEFAULT_INITIAL_ROWS,
            initial_cols: DEFAULT_INITIAL_COLS,
            policy: SyncPolicy::default(),
        }
    }
}

impl SyncConfig {
    pub fn with_tab_name(mut self, tab_name: impl Into<String>) -> Self {
        self.tab_name = tab_name.into();
        self
    }

    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_initial_size(mut self, rows: usize, cols: usize) -> Self {
        self.initial_rows = rows;
        self.initial_cols = cols;
        self
    }
}

/// Result of a successful sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    /// Record rows written (header excluded)
    pub written: usize,
    /// True when this call wrote the header row
    pub header_enforced: bool,
}

/// Writes post batches into the configured tab of a destination.
#[derive(Clone)]
pub struct Synchronizer {
    store: Arc<dyn TabularStore>,
    config: SyncConfig,
}

impl Synchronizer {
    pub fn new(store: Arc<dyn TabularStore>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Sync `records` into the destination, in order.
    ///
    /// Errors are returned as-is; nothing is retried.
    pub async fn sync(&self, destination_id: &str, records: &[PostRecord]) -> Result<SyncOutcome> {
        let destination = self.store.open(destination_id).await?;
        let tab = self.resolve_tab(destination.as_ref()).await?;
        let rows: Vec<Row> = records.iter().map(record_row).collect();

        let outcome = match self.config.policy {
            SyncPolicy::ClearAndRewrite => self.clear_and_rewrite(destination.as_ref(), &tab, rows).await?,
            SyncPolicy::AppendPreserving => self.append_preserving(destination.as_ref(), &tab, &rows).await?,
        };

        info!(
            destination_id,
            tab = %tab.name,
            policy = %self.config.policy,
            written = outcome.written,
            header_enforced = outcome.header_enforced,
            "Synced posts to destination"
        );

        Ok(outcome)
    }

    async fn resolve_tab(&self, destination: &dyn Destination) -> Result<TabHandle> {
        let name = &self.config.tab_name;

        if let Some(tab) = destination.tab(name).await? {
            debug!(tab = %name, state = ?tab.state(), rows = tab.populated_rows, "Resolved destination tab");
            return Ok(tab);
        }

        debug!(tab = %name, state = ?TabState::Absent, "Creating destination tab");
        let tab = destination
            .create_tab(name, self.config.initial_rows, self.config.initial_cols)
            .await?;
        Ok(tab)
    }

    async fn clear_and_rewrite(
        &self,
        destination: &dyn Destination,
        tab: &TabHandle,
        rows: Vec<Row>,
    ) -> Result<SyncOutcome> {
        let written = rows.len();
        let mut all = Vec::with_capacity(written + 1);
        all.push(header_row());
        all.extend(rows);

        if destination.supports_batch_writes() {
            destination.replace_rows(tab, &all).await?;
        } else {
            destination.clear(tab).await?;
            write_row_by_row(destination, tab, 0, &all).await?;
        }

        Ok(SyncOutcome {
            written,
            header_enforced: true,
        })
    }

    async fn append_preserving(
        &self,
        destination: &dyn Destination,
        tab: &TabHandle,
        rows: &[Row],
    ) -> Result<SyncOutcome> {
        let existing = match tab.state() {
            TabState::WithData => Some(destination.read_header(tab).await?),
            TabState::Empty | TabState::Absent => None,
        };
        let header_ok = existing.as_ref().is_some_and(|header| *header == header_row());

        if !header_ok {
            let old_width = existing.as_ref().map_or(0, Vec::len);
            debug!(tab = %tab.name, old_width, "Writing header row");
            destination
                .write_range(tab, 0, &[padded_header(old_width.max(tab.col_count))])
                .await?;
        }

        if !rows.is_empty() {
            let start = tab.populated_rows.max(1);
            if destination.supports_batch_writes() {
                destination.write_range(tab, start, rows).await?;
            } else {
                write_row_by_row(destination, tab, start, rows).await?;
            }
        }

        Ok(SyncOutcome {
            written: rows.len(),
            header_enforced: !header_ok,
        })
    }
}

/// The header followed by blanks up to `width` cells, so a wider old first
/// row is fully overwritten.
fn padded_header(width: usize) -> Row {
    let mut row = header_row();
    if row.len() < width {
        row.resize(width, String::new());
    }
    row
}

async fn write_row_by_row(
    destination: &dyn Destination,
    tab: &TabHandle,
    start: usize,
    rows: &[Row],
) -> Result<()> {
    for (offset, row) in rows.iter().enumerate() {
        destination
            .write_range(tab, start + offset, std::slice::from_ref(row))
            .await?;
    }
    Ok(())
}
