//! Conversion recording service.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{Conversion, ConversionInput};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// Records conversions, the attribution ledger.
///
/// Unlike clicks, conversions are written synchronously: the caller gets an
/// answer only after the row is stored, and store failures are returned.
pub struct ConversionService {
    repository: Arc<dyn AnalyticsRepository>,
}

impl ConversionService {
    /// Creates a new conversion service.
    pub fn new(repository: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repository }
    }

    /// Validates and stores one conversion.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `user_id`, `deeplink_id` or
    /// `event_type` is missing or empty; nothing is written in that case.
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] if the insert fails.
    pub async fn record(&self, input: ConversionInput) -> Result<Conversion, AppError> {
        let new_conversion = input.into_new_conversion()?;

        let conversion = self.repository.record_conversion(new_conversion).await?;

        metrics::counter!("deeplink_conversions_total").increment(1);
        info!(
            conversion_id = conversion.id,
            deeplink_id = %conversion.deeplink_id,
            event_type = %conversion.event_type,
            "Conversion recorded"
        );

        Ok(conversion)
    }
}
