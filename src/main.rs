//! Motor Alert Relay
//!
//! Relays motor sensor alerts from RabbitMQ into PostgreSQL and
//! re-publishes an enriched notification for downstream consumers:
//! - durable fanout topology declared idempotently on startup
//! - one-at-a-time consumption with bounded prefetch
//! - exactly one terminal disposition per delivery
//! - cooperative shutdown that drains the in-flight delivery

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use pipeline::{PipelineConfig, PipelineCoordinator};
use postgres_client::{PgStore, StoreConfig};
use rabbitmq::{BrokerClient, BrokerConfig, Publisher};
use telemetry::{health, init_tracing_from_env, metrics};

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    broker: BrokerConfig,

    #[serde(default)]
    store: StoreConfig,

    #[serde(default)]
    pipeline: PipelineConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Motor Alert Relay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    info!(
        alerts_queue = %config.broker.alerts_queue,
        prefetch = config.broker.prefetch_count,
        database = %config.store.database,
        "Loaded configuration"
    );

    // Both dependencies must be reachable before serving; any failure
    // below exits with status 1.
    let broker = BrokerClient::connect(config.broker.clone())
        .await
        .context("Failed to connect to RabbitMQ")?;

    let store = PgStore::connect(config.store.clone())
        .await
        .context("Failed to connect to PostgreSQL")?;

    store
        .ensure_schema()
        .await
        .context("Failed to ensure database schema")?;

    broker
        .declare_topology()
        .await
        .context("Failed to declare broker topology")?;

    // Prefetch must be applied before consumption starts.
    broker
        .set_prefetch(config.broker.prefetch_count)
        .await
        .context("Failed to set prefetch")?;

    // Check health and update status
    check_health(&broker, &store).await;

    // Termination signals cancel the token; the consume loop checks it
    // at each iteration boundary.
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let publisher = Publisher::new(&broker);
    let coordinator = PipelineCoordinator::new(store.clone(), publisher, config.pipeline.clone());

    coordinator.run(&broker, shutdown).await?;

    // Shutdown sequencing: broker connection first, then the store.
    info!("Shutting down...");

    if let Err(e) = broker.close().await {
        error!("Failed to close broker connection: {e}");
    }
    store.close().await;

    let summary = metrics().snapshot();
    info!(
        deliveries_received = summary.deliveries_received,
        deliveries_acked = summary.deliveries_acked,
        deliveries_nacked = summary.deliveries_nacked,
        publish_failures = summary.publish_failures,
        "Shutdown complete"
    );

    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with prefixed environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("RELAY")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat environment names carried over from the original deployment
    if let Ok(url) = std::env::var("RABBITMQ_URL") {
        config.broker.url = url;
    }
    if let Ok(exchange) = std::env::var("MOTOR_ALERTS_EXCHANGE") {
        config.broker.alerts_exchange = exchange;
    }
    if let Ok(queue) = std::env::var("MOTOR_ALERTS_QUEUE") {
        config.broker.alerts_queue = queue;
    }
    if let Ok(exchange) = std::env::var("MOTOR_NOTIFICATIONS_EXCHANGE") {
        config.broker.notifications_exchange = exchange;
    }
    if let Ok(count) = std::env::var("PREFETCH_COUNT") {
        config.broker.prefetch_count = count.parse().context("Invalid PREFETCH_COUNT")?;
    }

    if let Ok(host) = std::env::var("DB_HOST") {
        config.store.host = host;
    }
    if let Ok(port) = std::env::var("DB_PORT") {
        config.store.port = port.parse().context("Invalid DB_PORT")?;
    }
    if let Ok(name) = std::env::var("DB_NAME") {
        config.store.database = name;
    }
    if let Ok(user) = std::env::var("DB_USER") {
        config.store.user = user;
    }
    if let Ok(password) = std::env::var("DB_PASSWORD") {
        config.store.password = password;
    }

    if let Ok(attempts) = std::env::var("RETRY_ATTEMPTS") {
        config.pipeline.retry_attempts = attempts.parse().context("Invalid RETRY_ATTEMPTS")?;
    }
    if let Ok(delay) = std::env::var("RETRY_DELAY") {
        config.pipeline.retry_delay_secs = delay.parse().context("Invalid RETRY_DELAY")?;
    }

    Ok(config)
}

/// Check dependency health on startup.
async fn check_health(broker: &BrokerClient, store: &PgStore) {
    if broker.is_connected() {
        health().rabbitmq.set_healthy();
        info!("RabbitMQ connection: healthy");
    } else {
        health().rabbitmq.set_unhealthy("Connection lost");
        error!("RabbitMQ connection: unhealthy");
    }

    if postgres_client::health::check_connection(store).await {
        health().postgres.set_healthy();
        info!("PostgreSQL connection: healthy");
    } else {
        health().postgres.set_unhealthy("Connection failed");
        error!("PostgreSQL connection: unhealthy");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
