//! # TaskKeep API Server
//!
//! Single-tenant task tracker: users register, log in for a bearer token,
//! and manage their own tasks.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Initialise tracing
//! 3. Connect to PostgreSQL and apply pending migrations
//! 4. Serve until Ctrl-C, then drain connections and close the pool
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskkeep-api
//! ```

use anyhow::Context;
use taskkeep_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use taskkeep_shared::{
    db::{migrations, pool},
    store::Stores,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "taskkeep_api=debug,taskkeep_shared=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(config.log_format);

    tracing::info!(
        "TaskKeep API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db_config = pool::DatabaseConfig {
        max_connections: config.database.max_connections,
        ..pool::DatabaseConfig::new(config.database.url.clone())
    };
    let db = pool::create_pool(db_config)
        .await
        .context("Failed to connect to database")?;

    migrations::run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    let state = AppState::new(Stores::postgres(db.clone()), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
