//! Weighted A/B destination selection.
//!
//! The random source is a parameter so tests can pass a seeded generator.

use rand::Rng;

use crate::domain::entities::{Deeplink, Variant};

/// Picks one variant with probability proportional to its weight.
///
/// Draws `r` uniformly from `[0, total)` and walks the variants, subtracting
/// each weight until one is larger than what is left of `r`.
///
/// # Returns
///
/// - `None` if `variants` is empty
/// - The first variant if no weight is positive (or the total is not finite)
/// - Otherwise the sampled variant
pub fn select_variant<'a, R>(variants: &'a [Variant], rng: &mut R) -> Option<&'a Variant>
where
    R: Rng + ?Sized,
{
    let first = variants.first()?;

    let total: f64 = variants.iter().map(Variant::effective_weight).sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(first);
    }

    let mut remaining = rng.random_range(0.0..total);
    for variant in variants {
        let weight = variant.effective_weight();
        if remaining < weight {
            return Some(variant);
        }
        remaining -= weight;
    }

    // Rounding can leave a sliver of `remaining` after the last variant.
    Some(first)
}

/// URL to redirect to: the chosen variant's, falling back to the deeplink's
/// own when there is no variant or the variant has no URL.
pub fn destination_for<'a>(deeplink: &'a Deeplink, variant: Option<&'a Variant>) -> &'a str {
    variant
        .map(|v| v.destination_url.as_str())
        .filter(|url| !url.is_empty())
        .unwrap_or(deeplink.destination_url.as_str())
}
