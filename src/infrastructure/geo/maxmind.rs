//! MaxMind City database lookups.

use anyhow::{Context, Result};
use maxminddb::{Reader, geoip2};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

use super::GeoLookup;
use crate::domain::entities::GeoLocation;

/// Geo lookup backed by a GeoLite2-City or GeoIP2-City `.mmdb` file.
///
/// The database is read into memory once at startup and shared between
/// clones.
#[derive(Clone)]
pub struct MaxMindGeoLookup {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoLookup {
    /// Opens the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not a valid MaxMind database.
    pub fn open(path: &str) -> Result<Self> {
        let reader = Reader::open_readfile(path)
            .with_context(|| format!("Failed to open GeoIP City database at {}", path))?;

        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

impl GeoLookup for MaxMindGeoLookup {
    fn lookup(&self, ip: &str) -> Option<GeoLocation> {
        let ip: IpAddr = match ip.parse() {
            Ok(ip) => ip,
            Err(_) => {
                debug!("Skipping geo lookup for unparseable address {:?}", ip);
                return None;
            }
        };

        let result = self.reader.lookup(ip).ok()?;

        if let Ok(Some(city)) = result.decode::<geoip2::City>() {
            let location = GeoLocation {
                country: city.country.iso_code.map(|s| s.to_string()),
                city: city.city.names.english.map(|s| s.to_string()),
            };
            return (location.country.is_some() || location.city.is_some()).then_some(location);
        }

        // Country-only databases carry no city records.
        match result.decode::<geoip2::Country>() {
            Ok(Some(country)) => country.country.iso_code.map(|code| GeoLocation {
                country: Some(code.to_string()),
                city: None,
            }),
            _ => None,
        }
    }
}
