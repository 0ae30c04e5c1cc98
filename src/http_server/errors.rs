//! # Gateway Errors
//!
//! Error types for the HTTP surface. Fatal subsystem errors map to
//! 5xx-class responses; malformed requests map to 4xx. Non-fatal
//! anomalies never pass through here; they travel in response bodies as
//! advisory text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::DbError;
use crate::rowset::RowSetError;

/// Result type for gateway handlers
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request body decoded but no entry was usable
    #[error("no valid entries in request: {0}")]
    NoValidEntries(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Statement execution failed
    #[error("{0}")]
    Db(#[from] DbError),

    /// Materialization or write extraction failed fatally
    #[error("{0}")]
    RowSet(#[from] RowSetError),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NoValidEntries(_) => StatusCode::BAD_REQUEST,
            GatewayError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::RowSet(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<GatewayError> for ErrorResponse {
    fn from(err: GatewayError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rowset::DriverError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GatewayError::NoValidEntries("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::RowSet(RowSetError::MissingResult).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_body() {
        let err = GatewayError::RowSet(RowSetError::Metadata(DriverError::new("boom")));
        let body = ErrorResponse::from(err);
        assert_eq!(body.code, 500);
        assert!(body.error.contains("boom"));
    }

    #[test]
    fn test_no_valid_entries_is_client_error() {
        let err = GatewayError::NoValidEntries("entry 0: table_name is required".to_string());
        let body = ErrorResponse::from(err);
        assert_eq!(body.code, 400);
        assert!(body.error.contains("table_name"));
    }
}
