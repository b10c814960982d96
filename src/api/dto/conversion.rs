//! DTOs for the conversion endpoint.

use serde::Serialize;

/// Acknowledgement returned once a conversion is stored.
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub success: bool,
}
