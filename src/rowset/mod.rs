//! Row-set materialization subsystem
//!
//! Turns driver-delivered query results, whose shape is known only at run
//! time, into ordered sequences of type-coerced, JSON-serializable records,
//! and extracts statistics from write outcomes.
//!
//! # Invariants
//!
//! - Every record in one outcome carries the same ordered key set, equal to
//!   the resolved column names
//! - SQL NULL never drops a key; it produces the type family's default
//! - A per-value coercion mismatch never aborts the scan; it accumulates in
//!   the outcome's anomaly list while the slot takes the family default
//! - The cursor is released on every exit path, including fatal errors
//!
//! The subsystem depends only on the capability traits in [`cursor`];
//! driver adapters live in `crate::db`.

mod coerce;
mod cursor;
mod errors;
mod materializer;
mod value;
mod write;

pub use coerce::{coerce, coerce_as};
pub use cursor::{ColumnDescriptor, ReadCursor, WriteResult};
pub use errors::{DriverError, RowAnomaly, RowSetError, RowSetResult};
pub use materializer::{materialize, Record, RowSetOutcome};
pub use value::{zero_timestamp, RawValue, TypeFamily, TypedValue};
pub use write::{extract_write_outcome, WriteOutcome};
