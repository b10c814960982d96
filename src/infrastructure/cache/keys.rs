//! Cache key scheme.
//!
//! - `dl:{short_code}` - serialized deeplink
//! - `dl:ip:{client_ip}:{short_code}` - per-client request counter

/// Key holding the cached deeplink for a short code.
pub fn deeplink_key(short_code: &str) -> String {
    format!("dl:{}", short_code)
}

/// Key holding the rate-limit counter for a client and short code.
pub fn rate_limit_key(client_ip: &str, short_code: &str) -> String {
    format!("dl:ip:{}:{}", client_ip, short_code)
}
