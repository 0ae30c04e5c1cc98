//! sqlx adapters for the row-set capability traits
//!
//! [`PgRowCursor`] wraps fetched rows and decodes each column position
//! into a [`RawValue`] by its reported type tag; [`PgWriteResult`] wraps a
//! statement outcome. The materializer core sees only the traits.

use sqlx::postgres::{PgQueryResult, PgRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::rowset::{DriverError, RawValue, ReadCursor, WriteResult};

/// Read cursor over rows fetched from PostgreSQL.
///
/// Column metadata comes from the row descriptor and is computed once; an
/// empty result set has no descriptor and yields no columns and no rows.
pub struct PgRowCursor {
    rows: Vec<PgRow>,
    names: Vec<String>,
    tags: Vec<String>,
    position: usize,
    started: bool,
}

impl PgRowCursor {
    pub fn new(rows: Vec<PgRow>) -> Self {
        let (names, tags) = match rows.first() {
            Some(row) => row
                .columns()
                .iter()
                .map(|column| {
                    (
                        column.name().to_string(),
                        column.type_info().name().to_ascii_uppercase(),
                    )
                })
                .unzip(),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            rows,
            names,
            tags,
            position: 0,
            started: false,
        }
    }
}

impl ReadCursor for PgRowCursor {
    fn column_names(&mut self) -> Result<Vec<String>, DriverError> {
        Ok(self.names.clone())
    }

    fn column_type_tags(&mut self) -> Result<Vec<String>, DriverError> {
        Ok(self.tags.clone())
    }

    fn advance(&mut self) -> bool {
        if self.started {
            self.position += 1;
        }
        self.started = true;
        self.position < self.rows.len()
    }

    fn scan(&mut self, slots: &mut [RawValue]) -> Result<(), DriverError> {
        let row = &self.rows[self.position];
        for (index, slot) in slots.iter_mut().enumerate() {
            *slot = decode_cell(row, index, &self.tags[index])?;
        }
        Ok(())
    }

    fn terminal_error(&mut self) -> Option<DriverError> {
        // rows were fully fetched up front; a transport failure surfaces at
        // fetch time, before this cursor exists
        None
    }

    fn close(&mut self) {
        self.rows.clear();
    }
}

/// Decode one cell into the raw shape its type tag promises.
///
/// Each tag tries its native decoding first and degrades to a textual or
/// byte form. Only a driver-level read failure surfaces as a scan error,
/// which is fatal upstream.
fn decode_cell(row: &PgRow, index: usize, tag: &str) -> Result<RawValue, DriverError> {
    let raw = row
        .try_get_raw(index)
        .map_err(|err| DriverError::new(format!("column {index}: {err}")))?;
    if raw.is_null() {
        return Ok(RawValue::Null);
    }

    let decoded = match tag {
        "BOOL" | "BOOLEAN" => row.try_get::<bool, _>(index).ok().map(RawValue::Bool),
        name if name.contains("INT") || name.contains("SERIAL") => row
            .try_get::<i64, _>(index)
            .ok()
            .or_else(|| row.try_get::<i32, _>(index).ok().map(i64::from))
            .or_else(|| row.try_get::<i16, _>(index).ok().map(i64::from))
            .map(RawValue::Int),
        name if name.contains("FLOAT") || name.contains("DOUBLE") || name.contains("REAL") => row
            .try_get::<f64, _>(index)
            .ok()
            .or_else(|| row.try_get::<f32, _>(index).ok().map(f64::from))
            .map(RawValue::Float),
        // NUMERIC/DECIMAL travel as their textual form; the coercion layer
        // parses them
        name if name.contains("NUMERIC") || name.contains("DECIMAL") => row
            .try_get::<String, _>(index)
            .ok()
            .map(RawValue::Text),
        name if name.contains("TIMESTAMPTZ") => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(index)
            .ok()
            .map(RawValue::Timestamp),
        name if name.contains("TIMESTAMP") => row
            .try_get::<chrono::NaiveDateTime, _>(index)
            .ok()
            .map(|value| RawValue::Timestamp(value.and_utc())),
        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(index)
            .ok()
            .and_then(|value| value.and_hms_opt(0, 0, 0))
            .map(|value| RawValue::Timestamp(value.and_utc())),
        "TIME" | "TIMETZ" => row
            .try_get::<chrono::NaiveTime, _>(index)
            .ok()
            .map(|value| {
                RawValue::Timestamp(
                    chrono::NaiveDate::default().and_time(value).and_utc(),
                )
            }),
        "BYTEA" => row.try_get::<Vec<u8>, _>(index).ok().map(RawValue::Bytes),
        "INET" | "CIDR" => raw.as_bytes().ok().map(decode_inet),
        _ => row.try_get::<String, _>(index).ok().map(RawValue::Text),
    };

    // a cell its tag's arm cannot decode degrades to raw bytes, so one odd
    // value stays a per-value coercion anomaly rather than a scan failure
    decoded
        .or_else(|| raw.as_bytes().ok().map(|bytes| RawValue::Bytes(bytes.to_vec())))
        .ok_or_else(|| {
            DriverError::new(format!(
                "column {index} ({tag}): driver value could not be decoded"
            ))
        })
}

/// Undo the INET/CIDR wire encoding.
///
/// Text-mode drivers deliver `addr` or `addr/prefix` literally; the binary
/// wire form is `[family, prefix, is_cidr, addr_len, addr...]`. Anything
/// else passes through as bytes for the coercion layer to judge.
fn decode_inet(raw: &[u8]) -> RawValue {
    if raw.len() >= 4 && raw.len() == 4 + raw[3] as usize {
        let prefix = raw[1];
        let addr = &raw[4..];
        if let Ok(octets) = <[u8; 4]>::try_from(addr) {
            let ip = Ipv4Addr::from(octets);
            return if prefix == 32 {
                RawValue::Bytes(addr.to_vec())
            } else {
                RawValue::Text(format!("{ip}/{prefix}"))
            };
        }
        if let Ok(octets) = <[u8; 16]>::try_from(addr) {
            let ip = Ipv6Addr::from(octets);
            return if prefix == 128 {
                RawValue::Bytes(addr.to_vec())
            } else {
                RawValue::Text(format!("{ip}/{prefix}"))
            };
        }
    }

    if let Ok(text) = std::str::from_utf8(raw) {
        if text.contains('.') || text.contains(':') {
            return RawValue::Text(text.to_string());
        }
    }

    RawValue::Bytes(raw.to_vec())
}

/// Write-result adapter over a statement outcome.
pub struct PgWriteResult {
    rows_affected: u64,
}

impl From<PgQueryResult> for PgWriteResult {
    fn from(result: PgQueryResult) -> Self {
        Self {
            rows_affected: result.rows_affected(),
        }
    }
}

impl WriteResult for PgWriteResult {
    fn last_insert_id(&self) -> Result<i64, DriverError> {
        // the protocol reports no generated id for a plain INSERT; callers
        // record this as a non-fatal anomaly
        Err(DriverError::new(
            "PostgreSQL does not report a generated identifier",
        ))
    }

    fn rows_affected(&self) -> Result<i64, DriverError> {
        Ok(self.rows_affected as i64)
    }
}
