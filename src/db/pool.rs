//! Pool construction and statement execution
//!
//! Connection acquisition, a connectivity check at startup, optional
//! schema bootstrap, and the two execution paths (fetch rows / execute a
//! write) consumed by the HTTP handlers.

use sqlx::postgres::{PgPoolOptions, PgQueryResult, PgRow};
use sqlx::PgPool;

use crate::queries::Statement;

use super::config::DbConfig;
use super::errors::{DbError, DbResult};

/// Environment variable naming an SQL script executed once at startup
const BOOTSTRAP_SCRIPT_VAR: &str = "DB_CREATE_TABLE_SCRIPT";

/// Open a pool and verify connectivity with a ping.
pub async fn connect(config: &DbConfig) -> DbResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await
        .map_err(DbError::Connect)?;

    // ping before declaring the pool usable
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(DbError::Connect)?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "database connection established"
    );

    Ok(pool)
}

/// Run the bootstrap script named by `DB_CREATE_TABLE_SCRIPT`, if set.
///
/// Returns whether a script was executed.
pub async fn run_bootstrap_script(pool: &PgPool) -> DbResult<bool> {
    let Ok(path) = std::env::var(BOOTSTRAP_SCRIPT_VAR) else {
        return Ok(false);
    };

    let script = std::fs::read_to_string(&path)
        .map_err(|source| DbError::BootstrapScript { path: path.clone(), source })?;

    sqlx::raw_sql(&script)
        .execute(pool)
        .await
        .map_err(DbError::Execute)?;

    tracing::info!(path = %path, "bootstrap script executed");
    Ok(true)
}

/// Fetch all rows of a SELECT-shaped statement.
pub async fn fetch_rows(pool: &PgPool, statement: &Statement) -> DbResult<Vec<PgRow>> {
    bind_params(sqlx::query(&statement.sql), &statement.params)
        .fetch_all(pool)
        .await
        .map_err(DbError::Execute)
}

/// Execute a write-shaped statement and return the driver's result handle.
pub async fn execute(pool: &PgPool, statement: &Statement) -> DbResult<PgQueryResult> {
    bind_params(sqlx::query(&statement.sql), &statement.params)
        .execute(pool)
        .await
        .map_err(DbError::Execute)
}

fn bind_params<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    params: &'q [String],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for param in params {
        query = query.bind(param.as_str());
    }
    query
}
