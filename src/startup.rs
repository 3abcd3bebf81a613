use crate::{config::Config, db, seed, service::PhotoService};
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing;

/// Prepares the database for serving: schema first, then optional sample data.
pub async fn init_resources(
    pool: &SqlitePool,
    service: &PhotoService,
    config: &Config,
) -> Result<()> {
    tracing::info!("Startup: Applying database migrations...");
    db::migrate(pool).await?;

    if config.seed_sample_data {
        tracing::info!("Startup: Seeding sample data...");
        seed::seed_sample_data(service)
            .await
            .context("Startup: Failed to seed sample data")?;
    } else {
        tracing::info!("Startup: Sample data seeding disabled");
    }

    tracing::info!("Startup: Resource initialization complete.");
    Ok(())
}
