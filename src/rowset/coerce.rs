//! Value coercion dispatcher
//!
//! A pure function from `(type tag, raw value)` to the canonical typed
//! value. The policy, in order:
//!
//! 1. SQL NULL always becomes the family default, with no anomaly.
//! 2. A matching shape becomes the canonical form.
//! 3. A non-matching shape becomes the family default plus one accumulated
//!    [`RowAnomaly::CoercionMismatch`].
//!
//! Unrecognized type tags are not an error; they coerce through the text
//! family so an unfamiliar database type never fails a row.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::errors::RowAnomaly;
use super::value::{RawValue, TypeFamily, TypedValue};

/// Coerce one raw value according to its driver-reported type tag.
pub fn coerce(type_tag: &str, raw: RawValue, column: &str) -> (TypedValue, Option<RowAnomaly>) {
    let family = TypeFamily::of_tag(type_tag).unwrap_or_else(|| {
        tracing::debug!(column, type_tag, "unrecognized column type, treating as text");
        TypeFamily::Text
    });
    coerce_as(family, type_tag, raw, column)
}

/// Coerce with a pre-resolved family.
///
/// The materializer classifies each column once per cursor and calls this
/// per value, so tag normalization is not repeated per row.
pub fn coerce_as(
    family: TypeFamily,
    type_tag: &str,
    raw: RawValue,
    column: &str,
) -> (TypedValue, Option<RowAnomaly>) {
    if raw.is_null() {
        return (family.default_value(), None);
    }

    let observed = raw.shape();
    match convert(family, raw) {
        Some(value) => (value, None),
        None => (
            family.default_value(),
            Some(RowAnomaly::CoercionMismatch {
                column: column.to_string(),
                type_tag: type_tag.to_string(),
                expected: family.expected_shape(),
                observed,
            }),
        ),
    }
}

/// Shape-accepting conversion per family. `None` means mismatch.
fn convert(family: TypeFamily, raw: RawValue) -> Option<TypedValue> {
    match family {
        TypeFamily::Integer => match raw {
            RawValue::Int(v) => Some(TypedValue::Int(v)),
            _ => None,
        },
        TypeFamily::Float => match raw {
            RawValue::Float(v) => Some(TypedValue::Float(v)),
            RawValue::Int(v) => Some(TypedValue::Float(v as f64)),
            // NUMERIC/DECIMAL commonly arrive as their textual form
            RawValue::Bytes(b) => parse_numeric(std::str::from_utf8(&b).ok()?),
            RawValue::Text(s) => parse_numeric(&s),
            _ => None,
        },
        TypeFamily::Boolean => match raw {
            RawValue::Bool(v) => Some(TypedValue::Bool(v)),
            _ => None,
        },
        TypeFamily::Text => match raw {
            RawValue::Text(s) => Some(TypedValue::Text(s)),
            RawValue::Bytes(b) => Some(TypedValue::Text(
                String::from_utf8_lossy(&b).into_owned(),
            )),
            _ => None,
        },
        TypeFamily::Timestamp => match raw {
            RawValue::Timestamp(t) => Some(TypedValue::Text(t.to_rfc3339())),
            _ => None,
        },
        TypeFamily::Inet => match raw {
            RawValue::Bytes(b) => decode_ip_bytes(&b),
            RawValue::Text(s) => parse_ip_text(&s),
            _ => None,
        },
        TypeFamily::Bytea => match raw {
            RawValue::Bytes(b) => Some(TypedValue::Text(BASE64.encode(b))),
            _ => None,
        },
    }
}

fn parse_numeric(text: &str) -> Option<TypedValue> {
    text.trim().parse::<f64>().ok().map(TypedValue::Float)
}

/// Address bytes: 4 octets IPv4, 16 octets IPv6, anything else is tried as
/// the textual form some drivers deliver.
fn decode_ip_bytes(bytes: &[u8]) -> Option<TypedValue> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(TypedValue::Text(Ipv4Addr::from(octets).to_string()))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(TypedValue::Text(Ipv6Addr::from(octets).to_string()))
        }
        _ => parse_ip_text(std::str::from_utf8(bytes).ok()?),
    }
}

/// Textual `addr` or `addr/prefix` form
fn parse_ip_text(text: &str) -> Option<TypedValue> {
    let trimmed = text.trim();
    let addr_part = trimmed.split('/').next()?;
    addr_part.parse::<IpAddr>().ok()?;
    if let Some(prefix) = trimmed.split('/').nth(1) {
        prefix.parse::<u8>().ok()?;
    }
    Some(TypedValue::Text(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn test_null_yields_default_without_anomaly() {
        let (value, anomaly) = coerce("INT", RawValue::Null, "id");
        assert_eq!(value, TypedValue::Int(0));
        assert!(anomaly.is_none());

        let (value, anomaly) = coerce("BOOLEAN", RawValue::Null, "active");
        assert_eq!(value, TypedValue::Bool(false));
        assert!(anomaly.is_none());

        let (value, anomaly) = coerce("TEXT", RawValue::Null, "name");
        assert_eq!(value, TypedValue::Text(String::new()));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_integer_family() {
        let (value, anomaly) = coerce("BIGINT", RawValue::Int(42), "id");
        assert_eq!(value, TypedValue::Int(42));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_integer_mismatch_defaults_and_reports() {
        let (value, anomaly) = coerce("BIGINT", RawValue::Text("oops".to_string()), "id");
        assert_eq!(value, TypedValue::Int(0));
        let anomaly = anomaly.expect("mismatch must be reported");
        match anomaly {
            RowAnomaly::CoercionMismatch {
                column, type_tag, ..
            } => {
                assert_eq!(column, "id");
                assert_eq!(type_tag, "BIGINT");
            }
            other => panic!("unexpected anomaly: {other:?}"),
        }
    }

    #[test]
    fn test_float_family_accepts_numeric_text() {
        let (value, anomaly) = coerce("NUMERIC", RawValue::Bytes(b"12.5".to_vec()), "price");
        assert_eq!(value, TypedValue::Float(12.5));
        assert!(anomaly.is_none());

        let (value, anomaly) = coerce("REAL", RawValue::Int(3), "ratio");
        assert_eq!(value, TypedValue::Float(3.0));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_float_rejects_unparseable_text() {
        let (value, anomaly) = coerce("DECIMAL", RawValue::Bytes(b"abc".to_vec()), "price");
        assert_eq!(value, TypedValue::Float(0.0));
        assert!(anomaly.is_some());
    }

    #[test]
    fn test_text_family_decodes_bytes() {
        let (value, anomaly) = coerce("VARCHAR", RawValue::Bytes(b"hello".to_vec()), "name");
        assert_eq!(value, TypedValue::Text("hello".to_string()));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_timestamp_renders_rfc3339() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let (value, anomaly) = coerce("TIMESTAMPTZ", RawValue::Timestamp(t), "created_at");
        assert_eq!(value, TypedValue::Text("2024-05-01T12:30:00+00:00".to_string()));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_timestamp_null_is_zero_timestamp() {
        let (value, anomaly) = coerce("TIMESTAMP", RawValue::Null, "created_at");
        assert_eq!(value, TypedValue::Text("1970-01-01T00:00:00+00:00".to_string()));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_inet_from_address_bytes() {
        let (value, anomaly) = coerce("INET", RawValue::Bytes(vec![192, 168, 0, 1]), "addr");
        assert_eq!(value, TypedValue::Text("192.168.0.1".to_string()));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_cidr_from_textual_form() {
        let (value, anomaly) = coerce("CIDR", RawValue::Text("10.0.0.0/8".to_string()), "net");
        assert_eq!(value, TypedValue::Text("10.0.0.0/8".to_string()));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_inet_garbage_is_mismatch() {
        let (value, anomaly) = coerce("INET", RawValue::Bytes(vec![1, 2, 3]), "addr");
        assert_eq!(value, TypedValue::Text(String::new()));
        assert!(anomaly.is_some());
    }

    #[test]
    fn test_bytea_encodes_base64() {
        let (value, anomaly) = coerce("BYTEA", RawValue::Bytes(vec![0xde, 0xad]), "blob");
        assert_eq!(value, TypedValue::Text("3q0=".to_string()));
        assert!(anomaly.is_none());
    }

    #[test]
    fn test_unknown_tag_falls_back_to_text() {
        let (value, anomaly) = coerce("HSTORE", RawValue::Bytes(b"k=>v".to_vec()), "attrs");
        assert_eq!(value, TypedValue::Text("k=>v".to_string()));
        assert!(anomaly.is_none());
    }
}
