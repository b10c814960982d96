//! A/B variant entity.

/// One weighted alternative destination owned by a deeplink.
///
/// Weights are relative: a variant with weight 3 is picked three times as
/// often as one with weight 1. Zero, negative and NaN weights never win a
/// draw on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub id: String,
    pub deeplink_id: String,
    pub destination_url: String,
    pub weight: f64,
}

impl Variant {
    pub fn new(
        id: impl Into<String>,
        deeplink_id: impl Into<String>,
        destination_url: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            deeplink_id: deeplink_id.into(),
            destination_url: destination_url.into(),
            weight,
        }
    }

    /// Weight as used for sampling; anything that is not a positive number
    /// counts as zero.
    pub fn effective_weight(&self) -> f64 {
        if self.weight > 0.0 { self.weight } else { 0.0 }
    }
}
