//! CRUD HTTP Routes
//!
//! One endpoint per operation. Each handler runs the same flow: decode
//! the batch body, validate per entry, build the parameterized statement,
//! execute, and hand the driver result to the row-set subsystem. Entry
//! rejections and build failures are advisory; subsystem failures are
//! fatal and map to 5xx.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use sqlx::PgPool;

use crate::db::{self, PgRowCursor, PgWriteResult};
use crate::queries::{validate_batch, CrudRequest, Operation, ValidatedBatch};
use crate::rowset::{extract_write_outcome, materialize, TypedValue};

use super::errors::{GatewayError, GatewayResult};
use super::response::{
    ExistsResponse, ExistsResult, ReadResponse, ReadResult, WriteResponse, WriteStats,
};

/// Gateway state shared across handlers
pub struct GatewayState {
    pub pool: PgPool,
}

impl GatewayState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Create the CRUD routes
pub fn crud_routes(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/create", post(create_handler))
        .route("/read", get(read_handler))
        .route("/update", patch(update_handler))
        .route("/delete", delete(delete_handler))
        .route("/exists", get(exists_handler))
        .with_state(state)
}

type ServerState = Arc<GatewayState>;

/// Reject batches with nothing runnable in them
fn require_entries(batch: ValidatedBatch) -> GatewayResult<ValidatedBatch> {
    if batch.accepted.is_empty() {
        let detail = if batch.rejected.is_empty() {
            "request array is empty".to_string()
        } else {
            batch
                .rejected
                .iter()
                .map(|entry| format!("entry {}: {}", entry.index, entry.reason))
                .collect::<Vec<_>>()
                .join("; ")
        };
        return Err(GatewayError::NoValidEntries(detail));
    }
    Ok(batch)
}

/// Advisory error strings for the rejected part of a batch
fn rejection_errors(batch: &ValidatedBatch) -> Vec<String> {
    batch
        .rejected
        .iter()
        .map(|entry| format!("entry {}: {}", entry.index, entry.reason))
        .collect()
}

/// Shared flow for create/update/delete
async fn run_write_batch(
    state: &GatewayState,
    entries: Vec<CrudRequest>,
    operation: Operation,
) -> GatewayResult<WriteResponse> {
    let batch = require_entries(validate_batch(entries, operation))?;
    let mut errors = rejection_errors(&batch);
    let mut results = Vec::new();

    for (index, entry) in &batch.accepted {
        let statement = match entry.statement(operation) {
            Ok(statement) => statement,
            Err(reason) => {
                errors.push(format!("entry {index}: {reason}"));
                continue;
            }
        };

        let result = PgWriteResult::from(db::execute(&state.pool, &statement).await?);
        let outcome = extract_write_outcome(Some(&result), operation.wants_last_insert_id())?;

        results.push(WriteStats {
            index: *index,
            last_insert_id: outcome.last_insert_id,
            rows_affected: outcome.rows_affected,
            errors: outcome.anomalies.iter().map(ToString::to_string).collect(),
        });
    }

    Ok(WriteResponse { results, errors })
}

/// Create records handler
async fn create_handler(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<CrudRequest>>,
) -> GatewayResult<(StatusCode, Json<WriteResponse>)> {
    let response = run_write_batch(&state, entries, Operation::Create).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Read records handler
async fn read_handler(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<CrudRequest>>,
) -> GatewayResult<Json<ReadResponse>> {
    let batch = require_entries(validate_batch(entries, Operation::Read))?;
    let mut errors = rejection_errors(&batch);
    let mut results = Vec::new();

    for (index, entry) in &batch.accepted {
        let statement = match entry.statement(Operation::Read) {
            Ok(statement) => statement,
            Err(reason) => {
                errors.push(format!("entry {index}: {reason}"));
                continue;
            }
        };

        let rows = db::fetch_rows(&state.pool, &statement).await?;
        let (outcome, fatal) = materialize(PgRowCursor::new(rows));
        if let Some(err) = fatal {
            return Err(err.into());
        }

        results.push(ReadResult::new(
            *index,
            outcome.records,
            outcome.anomalies.iter().map(ToString::to_string).collect(),
        ));
    }

    Ok(Json(ReadResponse { results, errors }))
}

/// Update records handler
async fn update_handler(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<CrudRequest>>,
) -> GatewayResult<Json<WriteResponse>> {
    let response = run_write_batch(&state, entries, Operation::Update).await?;
    Ok(Json(response))
}

/// Delete records handler
async fn delete_handler(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<CrudRequest>>,
) -> GatewayResult<Json<WriteResponse>> {
    let response = run_write_batch(&state, entries, Operation::Delete).await?;
    Ok(Json(response))
}

/// Existence probe handler
async fn exists_handler(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<CrudRequest>>,
) -> GatewayResult<Json<ExistsResponse>> {
    let batch = require_entries(validate_batch(entries, Operation::Exists))?;
    let mut errors = rejection_errors(&batch);
    let mut results = Vec::new();

    for (index, entry) in &batch.accepted {
        let statement = match entry.statement(Operation::Exists) {
            Ok(statement) => statement,
            Err(reason) => {
                errors.push(format!("entry {index}: {reason}"));
                continue;
            }
        };

        let rows = db::fetch_rows(&state.pool, &statement).await?;
        let (outcome, fatal) = materialize(PgRowCursor::new(rows));
        if let Some(err) = fatal {
            return Err(err.into());
        }

        // single row, single boolean column
        let exists = outcome
            .records
            .first()
            .and_then(|record| record.values().next())
            .map(|value| matches!(value, TypedValue::Bool(true)))
            .unwrap_or(false);

        results.push(ExistsResult {
            index: *index,
            exists,
        });
    }

    Ok(Json(ExistsResponse { results, errors }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::QueryError;

    fn lazy_state() -> Arc<GatewayState> {
        let pool = PgPool::connect_lazy("postgres://postgres@localhost/postgres")
            .expect("lazy pool never connects eagerly");
        Arc::new(GatewayState::new(pool))
    }

    #[tokio::test]
    async fn test_routes_build() {
        let _router = crud_routes(lazy_state());
    }

    #[test]
    fn test_require_entries_rejects_empty_batch() {
        let err = require_entries(ValidatedBatch::default()).unwrap_err();
        assert!(matches!(err, GatewayError::NoValidEntries(_)));
    }

    #[test]
    fn test_require_entries_reports_rejections() {
        let batch = validate_batch(
            vec![CrudRequest::default()], // missing table_name
            Operation::Read,
        );
        let err = require_entries(batch).unwrap_err();
        match err {
            GatewayError::NoValidEntries(detail) => {
                assert!(detail.contains("entry 0"));
                assert!(detail.contains(&QueryError::MissingTableName.to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
