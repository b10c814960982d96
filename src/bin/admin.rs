//! CLI administration tool for deeplink-service.
//!
//! Operator commands that would otherwise need direct database or Redis
//! access.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Show server version and row counts
//! cargo run --bin admin -- db info
//!
//! # Apply pending migrations
//! cargo run --bin admin -- db migrate --yes
//!
//! # Drop a cached deeplink so the next request reads the database
//! cargo run --bin admin -- cache evict abc123
//! ```
//!
//! # Environment Variables
//!
//! Same as the service: `DATABASE_URL` (or `DB_*` components) and
//! `REDIS_URL` (or `REDIS_*` components).

use deeplink_service::config::{Config, mask_connection_string};
use deeplink_service::infrastructure::cache::{CacheService, RedisCache, keys::deeplink_key};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;

/// CLI tool for operating deeplink-service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Deeplink cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info and table sizes
    Info,

    /// Apply pending migrations
    Migrate {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Cache operation subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Remove the cached entry for a short code
    Evict {
        /// Short code whose `dl:{code}` entry should be dropped
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Db { action } => {
            let pool = PgPool::connect(&config.database_url)
                .await
                .with_context(|| {
                    format!(
                        "Failed to connect to {}",
                        mask_connection_string(&config.database_url)
                    )
                })?;
            handle_db_action(action, &pool).await?
        }
        Commands::Cache { action } => handle_cache_action(action, &config).await?,
    }

    Ok(())
}

/// Handles database diagnostic and maintenance commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            println!("  PostgreSQL: {}", version.bright_white());
            println!();

            for (label, table) in [
                ("Deeplinks", "deeplinks"),
                ("Variants", "deeplink_ab_variants"),
                ("Clicks", "deeplink_clicks"),
                ("Conversions", "deeplink_conversions"),
            ] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                    .fetch_one(pool)
                    .await
                    .with_context(|| format!("Failed to count {}", table))?;

                println!(
                    "  {:<13}{}",
                    format!("{}:", label),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
        DbAction::Migrate { yes } => {
            println!("{}", "🛠  Apply migrations".bright_blue().bold());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Apply pending migrations to this database?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Migration failed")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Handles cache maintenance commands.
///
/// Eviction is a manual operator action; the service itself never
/// invalidates cached deeplinks before their TTL.
async fn handle_cache_action(action: CacheAction, config: &Config) -> Result<()> {
    match action {
        CacheAction::Evict { code } => {
            let Some(redis_url) = config.redis_url.as_deref() else {
                println!(
                    "{}",
                    "⚠️  Redis is not configured; each instance caches in-process and \
                     entries expire on their own."
                        .yellow()
                );
                return Ok(());
            };

            let cache = RedisCache::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;

            let key = deeplink_key(&code);
            let removed = cache
                .delete(&key)
                .await
                .with_context(|| format!("Failed to evict {}", key))?;

            if removed {
                println!("{} {}", "✅ Evicted".green().bold(), key.cyan());
            } else {
                println!("{} {}", "ℹ️  Not cached:".yellow(), key.cyan());
            }
        }
    }

    Ok(())
}
