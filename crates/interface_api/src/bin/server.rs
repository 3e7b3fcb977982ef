//! Smart Travel Claims - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory claims, simulated external services
//! cargo run --bin claims-api
//!
//! # PostgreSQL-backed claims
//! API_DATABASE_URL=postgres://localhost/claims cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! * `API_DATABASE_URL` - PostgreSQL connection string (optional)
//! * `API_CORS_ORIGINS` - Comma-separated allowed origins (default: *)
//! * `API_ADAPTER_TIMEOUT_MS` - External service call timeout (default: 5000)
//! * `API_SIMULATED_LATENCY_MIN_MS` / `API_SIMULATED_LATENCY_MAX_MS` - Simulated latency window

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::SystemClock;
use domain_claims::{ClaimService, ClaimStore, InMemoryClaimStore, SimulatedClaimServices};
use infra_db::{create_pool, DatabaseConfig, PostgresClaimStore};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load API configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Smart Travel Claims API Server"
    );

    let store = claim_store(&config).await?;
    let services = Arc::new(SimulatedClaimServices::new(config.simulated_services_config()));
    let service = Arc::new(ClaimService::new(
        store,
        services.clone(),
        Arc::new(SystemClock),
        config.workflow_config(),
    ));

    let app = create_router(AppState::new(service, services, config.clone()));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// PostgreSQL when a database URL is configured, otherwise in memory
async fn claim_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn ClaimStore>> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(DatabaseConfig::new(url))
                .await
                .context("Failed to connect to the claims database")?;
            Ok(Arc::new(PostgresClaimStore::new(pool)))
        }
        None => {
            tracing::warn!("API_DATABASE_URL not set; claims are kept in memory");
            Ok(Arc::new(InMemoryClaimStore::new()))
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
