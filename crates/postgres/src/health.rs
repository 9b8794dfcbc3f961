//! PostgreSQL health checks.

use tracing::{debug, error};

use crate::client::PgStore;

/// Issues a trivial round-trip query. Used by startup checks and
/// operational tooling, not by the ingestion hot path.
pub async fn check_connection(store: &PgStore) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(store.pool())
        .await
    {
        Ok(_) => {
            debug!("PostgreSQL connection healthy");
            true
        }
        Err(e) => {
            error!("PostgreSQL health check failed: {e}");
            false
        }
    }
}
