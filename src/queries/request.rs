//! CRUD request model
//!
//! Requests arrive as a JSON array of entries. Each entry is validated
//! independently: invalid entries are rejected per-index while the rest of
//! the batch proceeds.

use serde::Deserialize;

use super::errors::{QueryError, QueryResult};

/// The CRUD operation a request entry is executed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Exists,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Exists => "exists",
        }
    }

    /// Row-creating operations want the generated identifier extracted
    pub fn wants_last_insert_id(&self) -> bool {
        matches!(self, Operation::Create)
    }
}

/// One JSON-described CRUD entry.
///
/// `columns` pair positionally with `params` (filter or insert values) and,
/// for updates, with `new_params` (replacement values).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CrudRequest {
    /// Defaulted rather than required so an absent field reaches
    /// validation as empty, reported per entry instead of failing the
    /// whole batch decode
    #[serde(default)]
    pub table_name: String,

    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub params: Vec<String>,

    #[serde(default)]
    pub new_params: Vec<String>,
}

impl CrudRequest {
    /// Validate this entry for the given operation.
    pub fn validate(&self, operation: Operation) -> QueryResult<()> {
        if self.table_name.is_empty() {
            return Err(QueryError::MissingTableName);
        }

        if !self.params.is_empty() && self.columns.is_empty() {
            return Err(QueryError::ColumnsRequired);
        }

        if operation == Operation::Update && self.new_params.is_empty() {
            return Err(QueryError::NewParamsRequired);
        }

        Ok(())
    }
}

/// An entry rejected during batch validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Index of the entry in the request array
    pub index: usize,
    pub reason: QueryError,
}

/// A validated batch: accepted entries keep their original index so
/// responses can be correlated with the request array.
#[derive(Debug, Default)]
pub struct ValidatedBatch {
    pub accepted: Vec<(usize, CrudRequest)>,
    pub rejected: Vec<RejectedEntry>,
}

/// Validate every entry of a batch for one operation.
///
/// Never fails as a whole: a batch of only invalid entries yields an empty
/// `accepted` list and a full `rejected` list.
pub fn validate_batch(entries: Vec<CrudRequest>, operation: Operation) -> ValidatedBatch {
    let mut batch = ValidatedBatch::default();

    for (index, entry) in entries.into_iter().enumerate() {
        match entry.validate(operation) {
            Ok(()) => batch.accepted.push((index, entry)),
            Err(reason) => {
                tracing::warn!(index, %reason, "rejecting request entry");
                batch.rejected.push(RejectedEntry { index, reason });
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(table: &str) -> CrudRequest {
        CrudRequest {
            table_name: table.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_table_name_required() {
        let entry = request("");
        assert_eq!(
            entry.validate(Operation::Read),
            Err(QueryError::MissingTableName)
        );
    }

    #[test]
    fn test_params_without_columns_rejected() {
        let entry = CrudRequest {
            params: vec!["1".to_string()],
            ..request("users")
        };
        assert_eq!(
            entry.validate(Operation::Read),
            Err(QueryError::ColumnsRequired)
        );
    }

    #[test]
    fn test_update_requires_new_params() {
        let entry = CrudRequest {
            columns: vec!["name".to_string()],
            params: vec!["old".to_string()],
            ..request("users")
        };
        assert_eq!(
            entry.validate(Operation::Update),
            Err(QueryError::NewParamsRequired)
        );
        assert!(entry.validate(Operation::Read).is_ok());
    }

    #[test]
    fn test_batch_keeps_good_entries_and_indexes_bad_ones() {
        let entries = vec![
            request("users"),
            request(""),
            request("orders"),
        ];
        let batch = validate_batch(entries, Operation::Read);

        assert_eq!(batch.accepted.len(), 2);
        assert_eq!(batch.accepted[0].0, 0);
        assert_eq!(batch.accepted[1].0, 2);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].index, 1);
    }

    #[test]
    fn test_deserializes_with_optional_fields() {
        let entry: CrudRequest =
            serde_json::from_str(r#"{"table_name": "users"}"#).unwrap();
        assert_eq!(entry.table_name, "users");
        assert!(entry.columns.is_empty());
        assert!(entry.params.is_empty());
    }
}
