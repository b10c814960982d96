//! Conversion events tying a business outcome back to a deeplink.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::Validate;

use crate::error::AppError;

/// Unvalidated conversion payload as submitted by a client.
///
/// `user_id`, `deeplink_id` and `event_type` are required and must be
/// non-empty. `amount` accepts a JSON number or a numeric string.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ConversionInput {
    #[validate(
        required(message = "user_id is required"),
        length(min = 1, message = "user_id must not be empty")
    )]
    pub user_id: Option<String>,

    #[validate(
        required(message = "deeplink_id is required"),
        length(min = 1, message = "deeplink_id must not be empty")
    )]
    pub deeplink_id: Option<String>,

    pub campaign_id: Option<String>,

    #[validate(
        required(message = "event_type is required"),
        length(min = 1, message = "event_type must not be empty")
    )]
    pub event_type: Option<String>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub amount: Option<f64>,
}

impl ConversionInput {
    /// Validates the payload and converts it into an insertable record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any required field is missing or
    /// empty.
    pub fn into_new_conversion(self) -> Result<NewConversion, AppError> {
        self.validate()?;

        let (Some(user_id), Some(deeplink_id), Some(event_type)) =
            (self.user_id, self.deeplink_id, self.event_type)
        else {
            return Err(AppError::bad_request(
                "Missing required conversion fields",
                json!({}),
            ));
        };

        Ok(NewConversion {
            user_id,
            deeplink_id,
            campaign_id: self.campaign_id.filter(|c| !c.is_empty()),
            event_type,
            amount: self.amount,
        })
    }
}

/// Input data for persisting a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConversion {
    pub user_id: String,
    pub deeplink_id: String,
    pub campaign_id: Option<String>,
    pub event_type: String,
    pub amount: Option<f64>,
}

/// A persisted conversion row.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub id: i64,
    pub user_id: String,
    pub deeplink_id: String,
    pub campaign_id: Option<String>,
    pub event_type: String,
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}
