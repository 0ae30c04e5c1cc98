//! Query-construction error types

use thiserror::Error;

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while validating a request entry or building a statement
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("table_name is required")]
    MissingTableName,

    #[error("columns are required when params are provided")]
    ColumnsRequired,

    #[error("new_params are required for update requests")]
    NewParamsRequired,

    #[error("params and columns must have the same length ({columns} columns, {params} params)")]
    ArityMismatch { columns: usize, params: usize },

    #[error("at least one column is required for {0}")]
    ConditionsRequired(&'static str),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
