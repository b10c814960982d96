//! Repository trait for the append-only analytics tables.

use crate::domain::entities::{ClickEvent, Conversion, NewConversion};
use crate::error::AppError;
use async_trait::async_trait;

/// Write access to `deeplink_clicks` and `deeplink_conversions`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Inserts a click row.
    ///
    /// Called from a detached task; callers log failures instead of
    /// propagating them.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn record_click(&self, event: ClickEvent) -> Result<(), AppError>;

    /// Inserts a conversion row and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn record_conversion(&self, conversion: NewConversion) -> Result<Conversion, AppError>;
}
