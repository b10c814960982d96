//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Deeplink`] - A short code mapped to a destination URL
//! - [`Variant`] - A weighted A/B alternative destination
//! - [`ClickEvent`] - Analytics record written once per resolution
//! - [`ConversionInput`], [`NewConversion`], [`Conversion`] - Attribution ledger
//! - [`GeoLocation`] - Country/city enrichment for clicks
//!
//! Input/insert types (`ConversionInput`, `NewConversion`) are kept separate
//! from persisted rows (`Conversion`), following the `NewX` pattern.

pub mod click;
pub mod conversion;
pub mod deeplink;
pub mod geo;
pub mod variant;

pub use click::ClickEvent;
pub use conversion::{Conversion, ConversionInput, NewConversion};
pub use deeplink::Deeplink;
pub use geo::GeoLocation;
pub use variant::Variant;
