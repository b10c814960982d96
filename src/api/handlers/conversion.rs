//! Handler for conversion recording.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::conversion::ConversionResponse;
use crate::domain::entities::ConversionInput;
use crate::error::AppError;
use crate::state::AppState;

/// Stores a conversion event and acknowledges it.
///
/// # Endpoint
///
/// `POST /deeplink/conversion`
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": "u1",
///   "deeplink_id": "d1",
///   "campaign_id": "c1",
///   "event_type": "purchase",
///   "amount": 9.99
/// }
/// ```
///
/// `campaign_id` and `amount` are optional.
///
/// # Response
///
/// ```json
/// { "success": true }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: Malformed body or missing `user_id`, `deeplink_id`, `event_type`
/// - **503 Service Unavailable**: Destination store unreachable
pub async fn conversion_handler(
    State(state): State<AppState>,
    payload: Result<Json<ConversionInput>, JsonRejection>,
) -> Result<Json<ConversionResponse>, AppError> {
    let Json(input) = payload?;

    state.conversion_service.record(input).await?;

    Ok(Json(ConversionResponse { success: true }))
}
