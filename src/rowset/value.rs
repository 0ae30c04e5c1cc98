//! Raw and canonical value representations
//!
//! The scan step produces [`RawValue`] variants; the coercion dispatcher
//! turns them into [`TypedValue`]s, which are always JSON-representable.
//! Type tags are grouped into a closed set of [`TypeFamily`]s with a
//! constant default per family.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A value exactly as the driver delivered it, before coercion.
///
/// Lives only for the duration of one row's processing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// SQL NULL
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl RawValue {
    /// Short shape name used in anomaly messages
    pub fn shape(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Int(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Bool(_) => "boolean",
            RawValue::Bytes(_) => "bytes",
            RawValue::Text(_) => "text",
            RawValue::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

/// The canonical coerced form placed into records.
///
/// Timestamps, IP addresses, and BYTEA all canonicalize to `Text`
/// (RFC 3339, dotted/CIDR, and base64 respectively), so every variant
/// serializes to a stable JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Closed set of type-tag families.
///
/// Classification is total: any tag outside the table falls through to the
/// text family at the dispatch site (never an error by itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Integer,
    Float,
    Boolean,
    Text,
    Timestamp,
    Inet,
    Bytea,
}

/// Tag-to-family table. Tags are matched after uppercase normalization.
const FAMILY_TABLE: &[(&str, TypeFamily)] = &[
    ("INT", TypeFamily::Integer),
    ("INTEGER", TypeFamily::Integer),
    ("SMALLINT", TypeFamily::Integer),
    ("BIGINT", TypeFamily::Integer),
    ("SERIAL", TypeFamily::Integer),
    ("BIGSERIAL", TypeFamily::Integer),
    ("INT2", TypeFamily::Integer),
    ("INT4", TypeFamily::Integer),
    ("INT8", TypeFamily::Integer),
    ("FLOAT", TypeFamily::Float),
    ("DOUBLE PRECISION", TypeFamily::Float),
    ("REAL", TypeFamily::Float),
    ("NUMERIC", TypeFamily::Float),
    ("DECIMAL", TypeFamily::Float),
    ("FLOAT4", TypeFamily::Float),
    ("FLOAT8", TypeFamily::Float),
    ("BOOLEAN", TypeFamily::Boolean),
    ("BOOL", TypeFamily::Boolean),
    ("VARCHAR", TypeFamily::Text),
    ("TEXT", TypeFamily::Text),
    ("CHAR", TypeFamily::Text),
    ("BPCHAR", TypeFamily::Text),
    ("NAME", TypeFamily::Text),
    ("DATE", TypeFamily::Timestamp),
    ("TIME", TypeFamily::Timestamp),
    ("TIMESTAMP", TypeFamily::Timestamp),
    ("TIMESTAMPTZ", TypeFamily::Timestamp),
    ("INET", TypeFamily::Inet),
    ("CIDR", TypeFamily::Inet),
    ("BYTEA", TypeFamily::Bytea),
];

impl TypeFamily {
    /// Classify a driver-reported type tag.
    ///
    /// Returns `None` for unrecognized tags; the dispatcher treats those as
    /// text.
    pub fn of_tag(tag: &str) -> Option<TypeFamily> {
        let canonical = tag.trim().to_ascii_uppercase();
        FAMILY_TABLE
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, family)| *family)
    }

    /// The family's default value, used for SQL NULL and for shape
    /// mismatches.
    pub fn default_value(&self) -> TypedValue {
        match self {
            TypeFamily::Integer => TypedValue::Int(0),
            TypeFamily::Float => TypedValue::Float(0.0),
            TypeFamily::Boolean => TypedValue::Bool(false),
            TypeFamily::Text => TypedValue::Text(String::new()),
            TypeFamily::Timestamp => TypedValue::Text(zero_timestamp()),
            TypeFamily::Inet => TypedValue::Text(String::new()),
            TypeFamily::Bytea => TypedValue::Text(String::new()),
        }
    }

    /// Shape name expected by this family, for anomaly messages
    pub fn expected_shape(&self) -> &'static str {
        match self {
            TypeFamily::Integer => "integer",
            TypeFamily::Float => "float",
            TypeFamily::Boolean => "boolean",
            TypeFamily::Text => "text or bytes",
            TypeFamily::Timestamp => "timestamp",
            TypeFamily::Inet => "ip address bytes",
            TypeFamily::Bytea => "bytes",
        }
    }
}

/// RFC 3339 rendering of the zero timestamp (Unix epoch)
pub fn zero_timestamp() -> String {
    DateTime::<Utc>::UNIX_EPOCH.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_classification() {
        assert_eq!(TypeFamily::of_tag("BIGINT"), Some(TypeFamily::Integer));
        assert_eq!(TypeFamily::of_tag("bigint"), Some(TypeFamily::Integer));
        assert_eq!(
            TypeFamily::of_tag("DOUBLE PRECISION"),
            Some(TypeFamily::Float)
        );
        assert_eq!(TypeFamily::of_tag("TIMESTAMPTZ"), Some(TypeFamily::Timestamp));
        assert_eq!(TypeFamily::of_tag("CIDR"), Some(TypeFamily::Inet));
        assert_eq!(TypeFamily::of_tag("HSTORE"), None);
    }

    #[test]
    fn test_family_defaults() {
        assert_eq!(TypeFamily::Integer.default_value(), TypedValue::Int(0));
        assert_eq!(TypeFamily::Float.default_value(), TypedValue::Float(0.0));
        assert_eq!(TypeFamily::Boolean.default_value(), TypedValue::Bool(false));
        assert_eq!(
            TypeFamily::Text.default_value(),
            TypedValue::Text(String::new())
        );
    }

    #[test]
    fn test_zero_timestamp_is_epoch() {
        assert_eq!(zero_timestamp(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_typed_value_serializes_to_bare_scalars() {
        assert_eq!(
            serde_json::to_string(&TypedValue::Int(42)).unwrap(),
            "42"
        );
        assert_eq!(
            serde_json::to_string(&TypedValue::Bool(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&TypedValue::Text("a".to_string())).unwrap(),
            "\"a\""
        );
    }

    #[test]
    fn test_raw_value_shapes() {
        assert_eq!(RawValue::Null.shape(), "null");
        assert_eq!(RawValue::Int(1).shape(), "integer");
        assert_eq!(RawValue::Bytes(vec![1]).shape(), "bytes");
    }
}
