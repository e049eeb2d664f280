//! # Rentroll API Server
//!
//! REST backend for managing properties, units, tenants and leases.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/rentroll cargo run -p rentroll-api
//! ```
//!
//! Set `LOG_FORMAT=json` for one JSON object per log line.

use rentroll_api::{
    app::{build_router, AppState},
    config::Config,
};
use rentroll_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry RUST_LOG, so load it before the subscriber
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "Rentroll API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::connect(
        &pool::PoolConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await?;

    if config.run_migrations {
        migrations::run_migrations(&db).await?;
    } else {
        let status = migrations::migration_status(&db).await?;
        if !status.is_up_to_date() {
            tracing::warn!(
                applied = status.applied,
                known = status.known,
                "Database schema is behind and RUN_MIGRATIONS is off"
            );
        }
    }

    let bind_address = config.bind_address();
    let production = config.api.production;
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %bind_address, production, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close(&db).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentroll_api=debug,rentroll_shared=info,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
