use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use portal_core::error::AppError;
use serde_json::json;

/// Liveness probe. Does not touch the backend.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "doc-portal",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the portal is only useful while the backend answers.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.backend.list_requests(None).await.map_err(|e| {
        tracing::warn!(backend = %state.backend.base_url(), error = %e, "Backend not ready");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(json!({ "status": "ready" })))
}
