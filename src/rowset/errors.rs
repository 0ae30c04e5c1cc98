//! Row-set error types
//!
//! Two distinct kinds, and the distinction is part of the public contract:
//! - [`RowSetError`]: fatal, aborts the call and is returned to the caller.
//! - [`RowAnomaly`]: non-fatal, accumulated in the outcome while processing
//!   continues.

use thiserror::Error;

/// Result type for row-set operations
pub type RowSetResult<T> = Result<T, RowSetError>;

/// Opaque driver-side failure surfaced through a capability trait.
///
/// The core never inspects driver errors; it only carries their message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fatal row-set errors
///
/// Any of these aborts materialization/extraction; partial results are
/// discarded and the cursor is still released.
#[derive(Debug, Error)]
pub enum RowSetError {
    /// Column names or type tags could not be resolved
    #[error("column metadata unavailable: {0}")]
    Metadata(DriverError),

    /// Driver-level failure while scanning a row
    #[error("scanning row {row}: {source}")]
    Scan { row: usize, source: DriverError },

    /// Cursor reported a terminal error after iteration
    ///
    /// Distinguishes "ran out of rows" from "stopped on a transport error";
    /// callers may rely on this for retry policy.
    #[error("cursor failed after {rows} rows: {source}")]
    Terminal { rows: usize, source: DriverError },

    /// Write-result handle was absent
    #[error("write result handle is missing")]
    MissingResult,

    /// Affected-row count could not be read
    ///
    /// Never defaulted: a fabricated count would mislead caller retry and
    /// idempotency logic.
    #[error("rows-affected unavailable: {0}")]
    RowsAffected(DriverError),
}

/// Non-fatal anomalies accumulated while an operation continues
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowAnomaly {
    /// A non-null raw value did not match the shape its type tag expects
    #[error("column {column} ({type_tag}): expected {expected}, got {observed}")]
    CoercionMismatch {
        column: String,
        type_tag: String,
        expected: &'static str,
        observed: &'static str,
    },

    /// The generated identifier could not be read after a row-creating write
    #[error("last insert id unavailable: {0}")]
    LastInsertId(String),
}
