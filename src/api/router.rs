//! Service router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! CORS is permissive: the service is meant to sit behind a local reverse
//! proxy or be called directly from course tooling.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the grading service router.
pub fn grading_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::health::check))
        .route("/health", get(endpoints::health::check))
        .route("/grade", post(endpoints::grade::grade))
        .route("/grade/batch", post(endpoints::grade::grade_batch))
        .route("/chat", post(endpoints::chat::send))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
