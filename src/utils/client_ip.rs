//! Client IP extraction for rate limiting and click records.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Returns the client IP as text.
///
/// With `behind_proxy` set, the first parseable address in
/// `X-Forwarded-For` wins, then `X-Real-IP`. Without it, or when neither
/// header yields an address, the socket peer address is used. Proxy headers
/// are client-controlled, so they are only trusted when a reverse proxy in
/// front of the service overwrites them.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip.to_string();
    }

    peer.ip().to_string()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    // X-Forwarded-For can be a comma-separated list; the first entry is the client.
    let from_xff = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    from_xff.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
    })
}
