//! Database layer error types

use thiserror::Error;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors from connection setup and statement execution
#[derive(Debug, Error)]
pub enum DbError {
    #[error("connecting to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("executing statement: {0}")]
    Execute(#[source] sqlx::Error),

    #[error("reading bootstrap script {path}: {source}")]
    BootstrapScript {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
