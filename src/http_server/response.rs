//! # Response Formatting
//!
//! Standard response types for the gateway. Every response carries an
//! `errors` field: the accumulated non-fatal anomalies and per-entry
//! rejections, advisory alongside otherwise-successful data.

use serde::Serialize;

use crate::rowset::Record;

/// Result of one read entry
#[derive(Debug, Serialize)]
pub struct ReadResult {
    /// Index of the entry in the request array
    pub index: usize,
    pub rows: Vec<Record>,
    pub row_count: usize,
    /// Per-value coercion anomalies, rendered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ReadResult {
    pub fn new(index: usize, rows: Vec<Record>, errors: Vec<String>) -> Self {
        let row_count = rows.len();
        Self {
            index,
            rows,
            row_count,
            errors,
        }
    }
}

/// Read response over a whole batch
#[derive(Debug, Serialize)]
pub struct ReadResponse {
    pub results: Vec<ReadResult>,
    /// Entry-level rejections and build failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Statistics of one write entry
#[derive(Debug, Serialize)]
pub struct WriteStats {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<i64>,
    pub rows_affected: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Write response over a whole batch
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub results: Vec<WriteStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Result of one existence probe
#[derive(Debug, Serialize)]
pub struct ExistsResult {
    pub index: usize,
    pub exists: bool,
}

/// Exists response over a whole batch
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub results: Vec<ExistsResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
