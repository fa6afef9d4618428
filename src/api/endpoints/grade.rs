//! Grading endpoints.
//!
//! - `POST /grade` — grade a single FRQ response
//! - `POST /grade/batch` — grade a list sequentially, never failing wholesale

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::grading::{GradingRequest, GradingResult};

/// `POST /grade` — grade a single request.
///
/// 400 on invalid fields, 504/502 propagated from backend invocation
/// failures via `ApiError`.
pub async fn grade(
    State(ctx): State<ApiContext>,
    Json(request): Json<GradingRequest>,
) -> Result<Json<GradingResult>, ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    tracing::info!(
        question = request.question_number.as_deref().unwrap_or("-"),
        max_points = request.max_points,
        "Grading request received"
    );

    let result = ctx.grader.grade(&request).await?;
    Ok(Json(result))
}

/// `POST /grade/batch` — grade a list of requests.
///
/// Per-item failures are embedded as zero-score results, so the response
/// is always a full-length array. 400 only for invalid request fields.
pub async fn grade_batch(
    State(ctx): State<ApiContext>,
    Json(requests): Json<Vec<GradingRequest>>,
) -> Result<Json<Vec<GradingResult>>, ApiError> {
    for request in &requests {
        request.validate().map_err(ApiError::BadRequest)?;
    }

    tracing::info!(items = requests.len(), "Batch grading request received");

    Ok(Json(ctx.grader.grade_batch(&requests).await))
}
