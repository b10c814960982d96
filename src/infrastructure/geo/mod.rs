//! IP geolocation used to enrich click events.
//!
//! Provides a [`GeoLookup`] trait with two implementations:
//! - [`MaxMindGeoLookup`] - Reads a MaxMind GeoLite2/GeoIP2 City database
//! - [`NullGeoLookup`] - Always returns no data (no database configured)

mod maxmind;

pub use maxmind::MaxMindGeoLookup;

use crate::domain::entities::GeoLocation;

/// Maps an IP address to a best-effort location.
///
/// Implementations must never fail: unparseable addresses, private ranges
/// and database misses all yield `None`.
#[cfg_attr(test, mockall::automock)]
pub trait GeoLookup: Send + Sync {
    fn lookup(&self, ip: &str) -> Option<GeoLocation>;
}

/// Geo lookup that knows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGeoLookup;

impl GeoLookup for NullGeoLookup {
    fn lookup(&self, _ip: &str) -> Option<GeoLocation> {
        None
    }
}
