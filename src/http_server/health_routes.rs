//! Health HTTP Routes
//!
//! Liveness endpoint for load balancers and orchestrators.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use super::response::HealthResponse;

/// Create the health routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_routes_build() {
        let _router = health_routes();
    }
}
