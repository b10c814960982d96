//! Best-effort location attached to click events.

/// Country and city derived from a client IP address.
///
/// Either field may be missing; an empty location is a normal outcome, not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    /// ISO 3166-1 alpha-2 country code, e.g. `"DE"`.
    pub country: Option<String>,
    pub city: Option<String>,
}
