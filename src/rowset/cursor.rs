//! Capability traits at the data-access boundary
//!
//! The core depends on these traits only; no driver type crosses into the
//! materializer. The shapes mirror what any SQL driver can provide: column
//! names, column type tags, row advancement, slot scanning, a terminal
//! error check, and close.

use super::errors::DriverError;
use super::value::RawValue;

/// One column's metadata. Produced once per cursor, ordered, immutable for
/// the cursor's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Driver-reported storage type name, e.g. `"BIGINT"`, `"TIMESTAMPTZ"`
    pub type_tag: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }
}

/// A readable, single-pass result cursor.
///
/// Callers own the cursor exclusively for the duration of a materialization
/// call. `close` must be safe to call more than once.
pub trait ReadCursor {
    /// Ordered column names. Resolved once, before the first row.
    fn column_names(&mut self) -> Result<Vec<String>, DriverError>;

    /// Ordered column type tags, aligned with `column_names`.
    fn column_type_tags(&mut self) -> Result<Vec<String>, DriverError>;

    /// Advance to the next row. Returns `false` when no row remains or the
    /// cursor failed; the failure, if any, is reported by
    /// `terminal_error`.
    fn advance(&mut self) -> bool;

    /// Scan the current row into column-aligned slots.
    ///
    /// `slots.len()` equals the column count. A failure here is fatal for
    /// the whole materialization.
    fn scan(&mut self, slots: &mut [RawValue]) -> Result<(), DriverError>;

    /// The error that stopped iteration, if iteration did not simply run
    /// out of rows.
    fn terminal_error(&mut self) -> Option<DriverError>;

    /// Release the underlying resources.
    fn close(&mut self);
}

/// Outcome handle of an INSERT/UPDATE/DELETE.
pub trait WriteResult {
    /// Generated identifier of a row-creating statement.
    fn last_insert_id(&self) -> Result<i64, DriverError>;

    /// Number of rows the statement affected.
    fn rows_affected(&self) -> Result<i64, DriverError>;
}

/// Releases a [`ReadCursor`] on every exit path.
pub(super) struct CursorGuard<C: ReadCursor> {
    cursor: C,
}

impl<C: ReadCursor> CursorGuard<C> {
    pub(super) fn new(cursor: C) -> Self {
        Self { cursor }
    }
}

impl<C: ReadCursor> std::ops::Deref for CursorGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.cursor
    }
}

impl<C: ReadCursor> std::ops::DerefMut for CursorGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.cursor
    }
}

impl<C: ReadCursor> Drop for CursorGuard<C> {
    fn drop(&mut self) {
        self.cursor.close();
    }
}
