//! sqlgate - a JSON-over-HTTP gateway for PostgreSQL CRUD
//!
//! Request JSON in, parameterized SQL out, driver rows back, typed JSON
//! records plus a non-fatal anomaly list returned.

pub mod db;
pub mod http_server;
pub mod queries;
pub mod rowset;
