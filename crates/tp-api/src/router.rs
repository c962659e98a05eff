use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{state::ApiState, v1};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", v1::routes())
        .fallback(handler_404)
}

async fn root() -> impl IntoResponse {
    Json(json!({ "ok": true, "message": "TinyPal API Server" }))
}

/// Liveness
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the content store must answer
async fn readiness(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
