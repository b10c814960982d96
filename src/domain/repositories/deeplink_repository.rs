//! Repository trait for deeplink and variant reads.

use crate::domain::entities::{Deeplink, Variant};
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to deeplinks and their A/B variants.
///
/// The resolver never writes deeplinks; they are managed elsewhere.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDeeplinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeeplinkRepository: Send + Sync {
    /// Finds the deeplink for `short_code` if it is currently resolvable.
    ///
    /// A deeplink is resolvable when it is not soft-deleted, is active, and
    /// has no expiry or expires in the future. The campaign id is taken from
    /// the joined campaign row, so a dangling reference reads as `None`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Deeplink))` if an eligible link exists
    /// - `Ok(None)` if the code is unknown, deleted, inactive or expired
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn find_active_by_code(&self, short_code: &str) -> Result<Option<Deeplink>, AppError>;

    /// Loads every A/B variant owned by a deeplink, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn find_variants(&self, deeplink_id: &str) -> Result<Vec<Variant>, AppError>;

    /// Cheap round-trip used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
