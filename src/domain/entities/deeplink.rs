//! Deeplink entity representing a short code and its destination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code mapped to a destination URL.
///
/// Deeplinks are created and edited by an external management process; the
/// resolver only reads them. The same struct is serialized into the fast
/// cache under `dl:{short_code}`, so every field round-trips through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deeplink {
    pub id: String,
    pub short_code: String,
    pub destination_url: String,
    pub campaign_id: Option<String>,
    pub is_active: bool,
    pub expiry_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Deeplink {
    /// Creates an active, non-expiring deeplink.
    pub fn new(
        id: impl Into<String>,
        short_code: impl Into<String>,
        destination_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            short_code: short_code.into(),
            destination_url: destination_url.into(),
            campaign_id: None,
            is_active: true,
            expiry_at: None,
            deleted_at: None,
        }
    }

    pub fn with_campaign(mut self, campaign_id: impl Into<String>) -> Self {
        self.campaign_id = Some(campaign_id.into());
        self
    }

    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_at.is_some_and(|e| e <= now)
    }

    /// Whether the link may be resolved at `now`.
    ///
    /// Mirrors the store-side predicate: not deleted, active, and either
    /// without expiry or expiring strictly after `now`.
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_deleted() && self.is_active && !self.is_expired_at(now)
    }
}
