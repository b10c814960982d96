//! PostgreSQL implementation of the analytics repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ClickEvent, Conversion, NewConversion};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ConversionRow {
    id: i64,
    user_id: String,
    deeplink_id: String,
    campaign_id: Option<String>,
    event_type: String,
    amount: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<ConversionRow> for Conversion {
    fn from(row: ConversionRow) -> Self {
        Conversion {
            id: row.id,
            user_id: row.user_id,
            deeplink_id: row.deeplink_id,
            campaign_id: row.campaign_id,
            event_type: row.event_type,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for the click and conversion ledgers.
///
/// Both tables are append-only; `created_at` is set by the database.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn record_click(&self, event: ClickEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO deeplink_clicks
                (deeplink_id, campaign_id, variant_id, ip, user_agent, referrer, country, city)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.deeplink_id)
        .bind(event.campaign_id)
        .bind(event.variant_id)
        .bind(event.ip)
        .bind(event.user_agent)
        .bind(event.referrer)
        .bind(event.country)
        .bind(event.city)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn record_conversion(&self, conversion: NewConversion) -> Result<Conversion, AppError> {
        let row = sqlx::query_as::<_, ConversionRow>(
            r#"
            INSERT INTO deeplink_conversions
                (user_id, deeplink_id, campaign_id, event_type, amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, deeplink_id, campaign_id, event_type, amount, created_at
            "#,
        )
        .bind(conversion.user_id)
        .bind(conversion.deeplink_id)
        .bind(conversion.campaign_id)
        .bind(conversion.event_type)
        .bind(conversion.amount)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Conversion::from(row))
    }
}
