//! JSON-described CRUD requests and parameterized SQL construction
//!
//! A request entry names a table, a column list, and positional values;
//! the builders turn one entry plus an [`Operation`] into a `$N`-style
//! parameterized statement. Batches validate per entry, never as a whole.

mod builder;
mod errors;
mod request;

pub use builder::Statement;
pub use errors::{QueryError, QueryResult};
pub use request::{validate_batch, CrudRequest, Operation, RejectedEntry, ValidatedBatch};
