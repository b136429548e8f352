//! Account Service - Main Application Entry Point
//!
//! A REST API server for managing bank accounts: create and read accounts,
//! change account status, and transfer funds subject to account-status checks
//! and a configurable daily transfer limit.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries, embedded migrations)
//! - **Money**: integer cents in storage, decimal amounts on the wire
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool (file created on first run)
//! 3. Run database migrations
//! 4. Seed accounts from CSV if the database is empty
//! 5. Build HTTP router and start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod seed;
mod services;

use tracing_subscriber::EnvFilter;

use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let daily_limit_cents = models::money::to_cents(config.daily_transfer_limit)
        .filter(|cents| *cents > 0)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "DAILY_TRANSFER_LIMIT must be a positive amount with at most two decimal places, got {}",
                config.daily_transfer_limit
            )
        })?;

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Seed accounts from CSV if the database is empty
    let seeded = seed::seed_if_empty(&pool, &config.seed_csv_path).await?;
    if seeded > 0 {
        tracing::info!("Seeded {seeded} accounts from {}", config.seed_csv_path);
    }

    let app = routes::router(AppState {
        pool,
        daily_limit_cents,
    });

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
