//! Alert table schema.

use relay_core::{Error, Result};
use tracing::info;

use crate::client::PgStore;

/// SQL for creating the alerts table.
///
/// `value` stays NUMERIC so stored readings are exact; inserts cast
/// the bound float and reads project it back (see insert.rs/query.rs).
pub const CREATE_ALERTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS motor_alerts (
    id BIGSERIAL PRIMARY KEY,
    motor_id TEXT NOT NULL,
    sensor_type TEXT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL,
    value NUMERIC NOT NULL,
    alert_type TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

pub const CREATE_MOTOR_ID_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_motor_alerts_motor_id ON motor_alerts (motor_id)";

pub const CREATE_TIMESTAMP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_motor_alerts_timestamp ON motor_alerts (timestamp)";

pub const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_motor_alerts_created_at ON motor_alerts (created_at)";

/// All DDL statements in execution order.
pub fn all_statements() -> [&'static str; 4] {
    [
        CREATE_ALERTS_TABLE,
        CREATE_MOTOR_ID_INDEX,
        CREATE_TIMESTAMP_INDEX,
        CREATE_CREATED_AT_INDEX,
    ]
}

/// Executes the DDL statements. Every statement is `IF NOT EXISTS`, so
/// this is safe to run on every startup.
pub async fn ensure_schema(store: &PgStore) -> Result<()> {
    for ddl in all_statements() {
        sqlx::query(ddl)
            .execute(store.pool())
            .await
            .map_err(|e| Error::store_unavailable(format!("failed to execute DDL: {e}")))?;
    }

    info!("Database schema ensured");
    Ok(())
}
