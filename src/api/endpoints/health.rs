//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend_available: bool,
    pub model: String,
}

/// `GET /health` (and `GET /`) — backend reachability probe.
///
/// Never errors: an unreachable backend is reported as
/// `backend_available: false` with a degraded status.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let backend_available = ctx.grader.backend_available().await;

    Json(HealthResponse {
        status: if backend_available {
            "healthy"
        } else {
            "degraded"
        },
        backend_available,
        model: ctx.grader.model().to_string(),
    })
}
