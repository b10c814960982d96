//! Domain layer containing business entities and repository contracts.
//!
//! Nothing in here knows about HTTP, Redis or PostgreSQL. The application
//! layer composes these types into the resolution pipeline and the
//! infrastructure layer implements the repository traits.
//!
//! # Architecture
//!
//! - [`entities`] - Deeplinks, A/B variants, click and conversion records
//! - [`repositories`] - Data access trait definitions
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler hands the request to
//!    [`crate::application::services::ResolveService`]
//! 2. A [`entities::ClickEvent`] is assembled once the destination is known
//! 3. [`crate::application::services::AnalyticsRecorder`] spawns the insert
//!    and returns immediately
//! 4. The row lands in `deeplink_clicks` via
//!    [`repositories::AnalyticsRepository`], or the failure is logged

pub mod entities;
pub mod repositories;
