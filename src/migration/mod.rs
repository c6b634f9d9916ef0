//! Database migration module
//!
//! Applies the embedded schema migrations at startup.

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::info;

/// Run all pending migrations
pub async fn run(pool: &MySqlPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    info!("Database migrations applied");
    Ok(())
}
