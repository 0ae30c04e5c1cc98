//! # HTTP Server Module
//!
//! The gateway's HTTP surface: an Axum server translating JSON-described
//! CRUD batches into parameterized SQL and materialized JSON results.
//!
//! # Endpoints
//!
//! - `POST /create` - Insert rows
//! - `GET /read` - Select rows
//! - `PATCH /update` - Update rows
//! - `DELETE /delete` - Delete rows
//! - `GET /exists` - Existence probe
//! - `GET /health` - Health check

pub mod config;
pub mod crud_routes;
pub mod errors;
pub mod health_routes;
pub mod response;
pub mod server;

pub use config::HttpServerConfig;
pub use crud_routes::GatewayState;
pub use errors::{ErrorResponse, GatewayError, GatewayResult};
pub use server::HttpServer;
