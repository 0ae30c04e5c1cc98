//! Result-set materializer
//!
//! Consumes a [`ReadCursor`] and produces ordered, type-coerced records
//! plus an accumulated anomaly list.
//!
//! # Flow (strict order)
//!
//! 1. Resolve column metadata exactly once
//! 2. For each row: scan into column-aligned slots, coerce each slot,
//!    assemble a record keyed by column name
//! 3. After the last row, check the cursor's terminal error
//!
//! Row order is the cursor's delivery order; preserving it is a
//! correctness requirement. The cursor is released on every exit path.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::coerce::coerce_as;
use super::cursor::{ColumnDescriptor, CursorGuard, ReadCursor};
use super::errors::{RowAnomaly, RowSetError, RowSetResult};
use super::value::{RawValue, TypeFamily, TypedValue};

/// One materialized row: an ordered column-name to value mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Vec<(String, TypedValue)>,
}

impl Record {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, name: String, value: TypedValue) {
        self.columns.push((name, value));
    }

    /// Value for a column, if present
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Column names in record order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Values in record order
    pub fn values(&self) -> impl Iterator<Item = &TypedValue> {
        self.columns.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Everything a materialization produces.
///
/// `anomalies` is advisory: the records are complete and ordered even when
/// it is non-empty.
#[derive(Debug, Default)]
pub struct RowSetOutcome {
    pub records: Vec<Record>,
    pub anomalies: Vec<RowAnomaly>,
}

/// Materialize every row the cursor yields.
///
/// Returns the outcome together with an optional fatal error, distinctly
/// from the accumulated anomalies. On a metadata failure, a row-scan
/// failure, or a terminal cursor error, iteration stops and the rows
/// completed so far are still returned alongside the error, so callers can
/// tell partial success with anomalies apart from an aborted operation.
pub fn materialize<C: ReadCursor>(cursor: C) -> (RowSetOutcome, Option<RowSetError>) {
    let mut cursor = CursorGuard::new(cursor);
    let mut outcome = RowSetOutcome::default();

    let descriptors = match resolve_columns(&mut *cursor) {
        Ok(descriptors) => descriptors,
        Err(err) => return (outcome, Some(err)),
    };
    let families: Vec<TypeFamily> = descriptors
        .iter()
        .map(|column| {
            TypeFamily::of_tag(&column.type_tag).unwrap_or_else(|| {
                tracing::debug!(
                    column = %column.name,
                    type_tag = %column.type_tag,
                    "unrecognized column type, treating as text"
                );
                TypeFamily::Text
            })
        })
        .collect();

    let mut slots = vec![RawValue::Null; descriptors.len()];

    while cursor.advance() {
        for slot in slots.iter_mut() {
            *slot = RawValue::Null;
        }
        if let Err(source) = cursor.scan(&mut slots) {
            let err = RowSetError::Scan {
                row: outcome.records.len(),
                source,
            };
            return (outcome, Some(err));
        }

        let mut record = Record::with_capacity(descriptors.len());
        for (i, column) in descriptors.iter().enumerate() {
            let raw = std::mem::replace(&mut slots[i], RawValue::Null);
            let (value, anomaly) = coerce_as(families[i], &column.type_tag, raw, &column.name);
            record.push(column.name.clone(), value);
            if let Some(anomaly) = anomaly {
                outcome.anomalies.push(anomaly);
            }
        }
        outcome.records.push(record);
    }

    if let Some(source) = cursor.terminal_error() {
        let err = RowSetError::Terminal {
            rows: outcome.records.len(),
            source,
        };
        return (outcome, Some(err));
    }

    (outcome, None)
}

/// Resolve the ordered column descriptors. Called exactly once per cursor.
fn resolve_columns<C: ReadCursor>(cursor: &mut C) -> RowSetResult<Vec<ColumnDescriptor>> {
    let names = cursor.column_names().map_err(RowSetError::Metadata)?;
    let tags = cursor.column_type_tags().map_err(RowSetError::Metadata)?;

    if names.len() != tags.len() {
        return Err(RowSetError::Metadata(super::errors::DriverError::new(
            format!(
                "driver reported {} column names but {} type tags",
                names.len(),
                tags.len()
            ),
        )));
    }

    Ok(names
        .into_iter()
        .zip(tags)
        .map(|(name, tag)| ColumnDescriptor::new(name, tag))
        .collect())
}
