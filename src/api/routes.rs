//! Deeplink route table.

use crate::api::handlers::{conversion_handler, health_handler, redirect_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/deeplink`. None of them require authentication.
///
/// # Endpoints
///
/// - `GET  /d/{code}`     - Resolve a short code and redirect
/// - `POST /conversion`   - Record a conversion event
/// - `GET  /health`       - Database and cache health
pub fn deeplink_routes() -> Router<AppState> {
    Router::new()
        .route("/d/{code}", get(redirect_handler))
        .route("/conversion", post(conversion_handler))
        .route("/health", get(health_handler))
}
