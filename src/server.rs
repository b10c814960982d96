//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and geo setup, service wiring and the
//! Axum server lifecycle.

use crate::application::services::{ConversionService, ResolveService};
use crate::config::Config;
use crate::domain::repositories::{AnalyticsRepository, DeeplinkRepository};
use crate::infrastructure::cache::{CacheService, MemoryCache, RedisCache};
use crate::infrastructure::geo::{GeoLookup, MaxMindGeoLookup, NullGeoLookup};
use crate::infrastructure::persistence::{PgAnalyticsRepository, PgDeeplinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

/// Attempts at connecting to PostgreSQL before giving up.
const DB_CONNECT_ATTEMPTS: usize = 3;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (retried, then fatal)
/// - Redis cache, or an in-process cache when Redis is not configured
/// - MaxMind geo lookup when a database path is configured
/// - Resolution and conversion services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after all attempts
/// - Redis is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = Arc::new(connect_database(&config).await?);
    info!("Connected to database");

    let cache = connect_cache(&config).await?;
    let geo = open_geo(&config);

    let deeplink_repository: Arc<dyn DeeplinkRepository> =
        Arc::new(PgDeeplinkRepository::new(pool.clone()));
    let analytics_repository: Arc<dyn AnalyticsRepository> =
        Arc::new(PgAnalyticsRepository::new(pool));

    let resolve_service = Arc::new(ResolveService::new(
        cache.clone(),
        deeplink_repository.clone(),
        analytics_repository.clone(),
        geo,
        config.resolver_settings(),
    ));
    let conversion_service = Arc::new(ConversionService::new(analytics_repository));

    let state = AppState::new(
        resolve_service,
        conversion_service,
        deeplink_repository,
        cache,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Connects the pool, retrying with exponential backoff.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));
    let database_url = config.database_url.as_str();

    let strategy = ExponentialBackoff::from_millis(200)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(DB_CONNECT_ATTEMPTS - 1);

    Retry::start(strategy, || {
        let options = options.clone();
        async move {
            options
                .connect(database_url)
                .await
                .inspect_err(|e| warn!("Database connection attempt failed: {}", e))
        }
    })
    .await
    .with_context(|| {
        format!(
            "Failed to connect to database after {} attempts",
            DB_CONNECT_ATTEMPTS
        )
    })
}

/// Redis when configured (and it must answer), the in-process cache otherwise.
async fn connect_cache(config: &Config) -> Result<Arc<dyn CacheService>> {
    match &config.redis_url {
        Some(redis_url) => {
            let redis = RedisCache::connect(redis_url)
                .await
                .context("Redis is configured but unreachable")?;
            info!("Cache enabled (Redis)");
            Ok(Arc::new(redis))
        }
        None => {
            warn!(
                "Redis not configured; using in-process cache. Rate limits and cached \
                 deeplinks are not shared between instances."
            );
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}

/// Geo enrichment is best-effort: an unreadable database disables it.
fn open_geo(config: &Config) -> Arc<dyn GeoLookup> {
    let Some(path) = config.geoip_db_path.as_deref() else {
        info!("Geo lookup disabled");
        return Arc::new(NullGeoLookup);
    };

    match MaxMindGeoLookup::open(path) {
        Ok(geo) => {
            info!("Geo lookup enabled ({})", path);
            Arc::new(geo)
        }
        Err(e) => {
            warn!("{:#}. Geo lookup disabled.", e);
            Arc::new(NullGeoLookup)
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}
