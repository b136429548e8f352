//! HTTP router construction and shared application state.
//!
//! Kept separate from `main` so tests can drive the full router in-process
//! without binding a socket.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{db::DbPool, handlers};

/// State shared with every handler via axum's `State` extraction.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: DbPool,

    /// Daily outgoing transfer limit, in cents
    pub daily_limit_cents: i64,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Account management routes
        .route("/accounts", post(handlers::accounts::create_account))
        .route("/accounts/{id}", get(handlers::accounts::get_account))
        .route(
            "/accounts/{id}/status",
            post(handlers::accounts::change_status),
        )
        // Transfer route
        .route("/transfer", post(handlers::transfers::create_transfer))
        // Add tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state)
}
