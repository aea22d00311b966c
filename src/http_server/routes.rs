//! Query API routes
//!
//! The request boundary owns the engine: state is built once at startup from
//! the loaded record store and shared across handlers. Query errors map to
//! client responses here; the pipeline itself never sees HTTP.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};
use crate::query::{QueryEngine, QueryError, QueryErrorCode};

/// Shared application state.
pub struct AppState {
    pub engine: QueryEngine,
}

impl AppState {
    /// Creates state around an already-loaded engine.
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }
}

/// Builds the API router.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/datasets", get(list_datasets))
        .route("/query", post(perform_query))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<Value> {
    let datasets = state.engine.store().list();
    Json(json!({"status": "ok", "data": datasets}))
}

async fn perform_query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    log_event_with_fields(Event::QueryReceived, &[("request_id", request_id.as_str())]);

    match state.engine.run(&body) {
        Ok(rows) => {
            log_event_with_fields(
                Event::QueryCompleted,
                &[("request_id", request_id.as_str()), ("rows", &rows.len().to_string())],
            );
            (StatusCode::OK, Json(json!({"status": "ok", "data": rows}))).into_response()
        }
        Err(err) => {
            log_event_with_fields(
                Event::QueryRejected,
                &[("request_id", request_id.as_str()), ("code", err.code().code())],
            );
            error_response(&err)
        }
    }
}

/// Maps pipeline errors to HTTP statuses: unknown dataset is 404, everything
/// the client can fix is 400.
fn error_response(err: &QueryError) -> Response {
    let status = match err.code() {
        QueryErrorCode::TimberUnknownDataset => StatusCode::NOT_FOUND,
        QueryErrorCode::TimberQueryInvalid
        | QueryErrorCode::TimberTypeMismatch
        | QueryErrorCode::TimberResultTooLarge => StatusCode::BAD_REQUEST,
    };
    let body = json!({
        "status": "error",
        "code": err.code().code(),
        "message": err.message(),
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RecordStore, Schema};

    fn test_state() -> Arc<AppState> {
        let mut store = RecordStore::new();
        store.add(
            "contractors",
            Schema::contractors(),
            vec![json!({"companyName": "Acme", "city": "Houston"})],
        );
        Arc::new(AppState::new(QueryEngine::new(Arc::new(store))))
    }

    #[test]
    fn test_router_builds() {
        let _router = api_routes(test_state());
    }

    #[test]
    fn test_error_status_mapping() {
        let invalid = QueryError::invalid("bad");
        let response = error_response(&invalid);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let unknown = QueryError::unknown_dataset("rooms");
        let response = error_response(&unknown);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let too_large = QueryError::result_too_large(5001, 5000);
        let response = error_response(&too_large);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
