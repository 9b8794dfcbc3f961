//! PostgreSQL client wrapper.

use std::time::Duration;

use relay_core::{Error, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::StoreConfig;
use crate::schema;

/// Pooled PostgreSQL store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    config: StoreConfig,
}

impl PgStore {
    /// Connects to PostgreSQL. A failure here is fatal at startup.
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.database_url())
            .await
            .map_err(|e| Error::connection(format!("failed to connect to PostgreSQL: {e}")))?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool, config })
    }

    /// Creates the alert table and indexes if absent. Idempotent; never
    /// drops or alters existing data.
    pub async fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(self).await
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed PostgreSQL pool");
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
