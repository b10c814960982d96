//! Click event recorded once per resolved request.

/// Analytics record for a single successful resolution.
///
/// Assembled by the resolution pipeline after the destination is chosen and
/// handed to the background recorder. Append-only; the resolver never reads
/// clicks back.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub deeplink_id: String,
    pub campaign_id: Option<String>,
    /// `None` when the deeplink has no variants.
    pub variant_id: Option<String>,
    pub ip: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}
