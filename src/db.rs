// Standard library imports
use std::{str::FromStr, time::Duration};

// External crate imports
use anyhow::{Context, Result};
use backoff::{future::retry, ExponentialBackoff};
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing;

// Internal crate imports
use crate::config::Config;

/// Embedded schema migrations for the photo tables.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the connection pool described by `config`.
///
/// A database that is not reachable yet is retried with exponential backoff
/// for up to 30 seconds before giving up.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("Failed to parse database URL '{}'", config.database_url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let policy = ExponentialBackoff {
        max_elapsed_time: Some(Duration::from_secs(30)),
        ..ExponentialBackoff::default()
    };

    let max_connections = config.database_max_connections;
    let pool = retry(policy, || {
        let connect_options = connect_options.clone();
        async move {
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(connect_options)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "Database not reachable yet, retrying");
                    backoff::Error::transient(e)
                })
        }
    })
    .await
    .context("Failed to connect to the database")?;

    tracing::info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies pending migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Migrated in-memory database on a single long-lived connection.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to exactly one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(connect_options)
        .await
        .context("Failed to open in-memory database")?;

    migrate(&pool).await?;
    Ok(pool)
}
