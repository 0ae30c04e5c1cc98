//! Database layer
//!
//! Connection configuration, pool construction, statement execution, and
//! the sqlx-backed adapters implementing the row-set capability traits.

mod config;
mod cursor;
mod errors;
mod pool;

pub use config::DbConfig;
pub use cursor::{PgRowCursor, PgWriteResult};
pub use errors::{DbError, DbResult};
pub use pool::{connect, execute, fetch_rows, run_bootstrap_script};
