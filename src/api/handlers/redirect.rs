//! Handler for deeplink resolution.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::application::services::ResolveRequest;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip;

/// Resolves a short code and redirects to the chosen destination.
///
/// # Endpoint
///
/// `GET /deeplink/d/{code}`
///
/// The click is recorded in the background and never delays the redirect.
/// See [`crate::application::services::ResolveService`] for the pipeline.
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: Resolved; A/B selection may differ next time
/// - **400 Bad Request**: Empty code, rate limit exceeded, or no eligible deeplink
/// - **503 Service Unavailable**: Destination store unreachable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let request = ResolveRequest {
        code,
        client_ip: client_ip(&headers, addr, state.behind_proxy),
        user_agent: header_value(&headers, header::USER_AGENT),
        referrer: header_value(&headers, header::REFERER),
    };

    let destination = state.resolve_service.resolve(request).await?;

    Ok(Redirect::temporary(&destination))
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
