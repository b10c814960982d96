//! PostgreSQL implementation of the deeplink repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Deeplink, Variant};
use crate::domain::repositories::DeeplinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct DeeplinkRow {
    id: String,
    short_code: String,
    destination_url: String,
    campaign_id: Option<String>,
    is_active: bool,
    expiry_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<DeeplinkRow> for Deeplink {
    fn from(row: DeeplinkRow) -> Self {
        Deeplink {
            id: row.id,
            short_code: row.short_code,
            destination_url: row.destination_url,
            campaign_id: row.campaign_id,
            is_active: row.is_active,
            expiry_at: row.expiry_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VariantRow {
    id: String,
    deeplink_id: String,
    destination_url: String,
    weight: f64,
}

impl From<VariantRow> for Variant {
    fn from(row: VariantRow) -> Self {
        Variant::new(row.id, row.deeplink_id, row.destination_url, row.weight)
    }
}

/// PostgreSQL repository for deeplink lookups.
pub struct PgDeeplinkRepository {
    pool: Arc<PgPool>,
}

impl PgDeeplinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeeplinkRepository for PgDeeplinkRepository {
    async fn find_active_by_code(&self, short_code: &str) -> Result<Option<Deeplink>, AppError> {
        let row = sqlx::query_as::<_, DeeplinkRow>(
            r#"
            SELECT
                d.id,
                d.short_code,
                d.destination_url,
                c.id AS campaign_id,
                d.is_active,
                d.expiry_at,
                d.deleted_at
            FROM deeplinks d
            LEFT JOIN deeplink_campaigns c ON c.id = d.campaign_id
            WHERE d.short_code = $1
              AND d.deleted_at IS NULL
              AND d.is_active = TRUE
              AND (d.expiry_at IS NULL OR d.expiry_at > NOW())
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Deeplink::from))
    }

    async fn find_variants(&self, deeplink_id: &str) -> Result<Vec<Variant>, AppError> {
        let rows = sqlx::query_as::<_, VariantRow>(
            r#"
            SELECT id, deeplink_id, destination_url, weight
            FROM deeplink_ab_variants
            WHERE deeplink_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(deeplink_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Variant::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
