//! Write-result extractor
//!
//! Pulls the generated identifier and affected-row count out of a write
//! outcome, tolerating an unreadable identifier without failing the whole
//! extraction.

use super::cursor::WriteResult;
use super::errors::{RowAnomaly, RowSetError, RowSetResult};

/// Statistics of an INSERT/UPDATE/DELETE.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Set only when the caller asked for it and the driver could report it
    pub last_insert_id: Option<i64>,
    pub rows_affected: i64,
    pub anomalies: Vec<RowAnomaly>,
}

/// Extract write statistics from an optional result handle.
///
/// A missing handle is fatal. When `wants_last_insert_id` is set (the
/// statement created rows), an unreadable identifier is recorded as an
/// anomaly and extraction continues. An unreadable affected-row count is
/// fatal and never defaulted.
pub fn extract_write_outcome<R: WriteResult>(
    result: Option<&R>,
    wants_last_insert_id: bool,
) -> RowSetResult<WriteOutcome> {
    let result = result.ok_or(RowSetError::MissingResult)?;

    let mut anomalies = Vec::new();
    let mut last_insert_id = None;

    if wants_last_insert_id {
        match result.last_insert_id() {
            Ok(id) => last_insert_id = Some(id),
            Err(err) => anomalies.push(RowAnomaly::LastInsertId(err.to_string())),
        }
    }

    let rows_affected = result.rows_affected().map_err(RowSetError::RowsAffected)?;

    Ok(WriteOutcome {
        last_insert_id,
        rows_affected,
        anomalies,
    })
}
