// =============================================================================
// PETSHOP ADMIN - Library Root
// =============================================================================
// WHAT THIS CRATE PROVIDES:
// - The product catalog view engine used by the admin dashboard: debounced
//   search, facet filters, stable sorting, pagination and image fallbacks
// - A ProductApi trait plus an HTTP implementation for the product REST API
// - An in-memory mock of that REST API for local development (the binary)
// =============================================================================

// -----------------------------------------------------------------------------
// MODULE DECLARATIONS
// -----------------------------------------------------------------------------
pub mod catalog; // Catalog view engine (catalog/)
pub mod client; // HTTP ProductApi (client.rs)
pub mod config; // Configuration loading (config.rs)
pub mod db; // In-memory product storage (db.rs)
pub mod error; // Error types (error.rs)
pub mod handlers; // HTTP request handlers (handlers.rs)
pub mod metrics; // Prometheus metrics setup (metrics.rs)
pub mod models; // Data structures (models.rs)

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::Database;

// -----------------------------------------------------------------------------
// APPLICATION STATE
// -----------------------------------------------------------------------------
// Shared by every request handler through State<Arc<AppState>>.
#[derive(Clone)]
pub struct AppState {
    /// In-memory product storage
    pub db: Database,

    /// Prometheus render handle. `None` when no recorder was installed
    /// (tests build several routers in one process).
    pub metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(
        db: Database,
        metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            db,
            metrics_handle: Some(metrics_handle),
        }
    }
}

// -----------------------------------------------------------------------------
// ROUTES
// -----------------------------------------------------------------------------
/// Build the mock REST API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ----- Health & Metrics -----
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        // ----- Product API -----
        .route(
            "/api/v1/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/v1/products/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/api/v1/products/:id/status",
            patch(handlers::set_product_status),
        )
        // ----- Middleware Layers -----
        // The dashboard runs on another origin during development
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
