//! releasio-fin library - Financials & Payouts module
//!
//! HTTP API over the shared catalog store. Payout summaries are derived
//! from the source releases on every request; the only writes are to the
//! source records (catalog, splits, royalty entries) and the payout-run
//! ledger.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        // Derived financials (read-only, recomputed per request)
        .route("/api/financials/summaries", get(api::summaries::list_summaries))
        .route("/api/financials/summaries/:month", get(api::summaries::get_summary))
        .route(
            "/api/financials/summaries/:month/collaborators",
            get(api::summaries::get_summary_collaborators),
        )
        .route("/api/financials/overview", get(api::summaries::get_overview))
        // Payout-run ledger
        .route("/api/financials/payouts", get(api::payouts::list_payout_runs))
        .route(
            "/api/financials/payouts/:month/distribute",
            post(api::payouts::distribute_payouts),
        )
        // Catalog editing
        .route(
            "/api/releases",
            get(api::releases::list_releases).post(api::releases::create_release),
        )
        .route("/api/releases/:id/royalties", post(api::releases::append_royalties))
        .route("/api/releases/:id/splits", put(api::splits::update_splits))
        .route(
            "/api/collaborators",
            get(api::collaborators::list_collaborators).post(api::collaborators::create_collaborator),
        )
        // Settings
        .route(
            "/api/settings/artist",
            get(api::settings::get_artist).put(api::settings::set_artist),
        )
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
