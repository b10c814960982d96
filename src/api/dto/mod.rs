//! Data Transfer Objects for API responses.
//!
//! Request bodies deserialize straight into domain inputs (see
//! [`crate::domain::entities::ConversionInput`]); only responses live here.

pub mod conversion;
pub mod health;
