// =============================================================================
// PETSHOP ADMIN - Mock REST Server Entry Point
// =============================================================================
// Runs an in-memory copy of the game backend's product API so the admin
// dashboard can be developed without the real backend.
//
// WHAT THIS BINARY DOES:
// - Serves product CRUD under /api/v1/products
// - Seeds demo products (SEED_DEMO_DATA=false to start empty)
// - Exposes /health and Prometheus /metrics
// =============================================================================

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petshop_admin::config::Config;
use petshop_admin::db::Database;
use petshop_admin::metrics::{set_catalog_size, setup_metrics};
use petshop_admin::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -------------------------------------------------------------------------
    // STEP 1: Load environment variables (.env is optional)
    // -------------------------------------------------------------------------
    dotenvy::dotenv().ok();

    // -------------------------------------------------------------------------
    // STEP 2: Initialize logging/tracing
    // -------------------------------------------------------------------------
    // RUST_LOG controls log levels, e.g. RUST_LOG=info,petshop_admin=debug
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,petshop_admin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Petshop Admin mock server...");

    // -------------------------------------------------------------------------
    // STEP 3: Load configuration
    // -------------------------------------------------------------------------
    let config = Config::from_env()?;
    info!(port = config.port, seed = config.seed_demo_data, "Configuration loaded");

    // -------------------------------------------------------------------------
    // STEP 4: Set up Prometheus metrics
    // -------------------------------------------------------------------------
    let metrics_handle = setup_metrics()?;
    info!("Prometheus metrics initialized");

    // -------------------------------------------------------------------------
    // STEP 5: Prepare the in-memory backend
    // -------------------------------------------------------------------------
    let db = Database::in_memory();
    if config.seed_demo_data {
        let seeded = db.seed_sample_data().await?;
        info!(products = seeded, "Demo catalog seeded");
    }
    set_catalog_size(db.count().await);

    // -------------------------------------------------------------------------
    // STEP 6: Build routes and serve
    // -------------------------------------------------------------------------
    let state = Arc::new(AppState::with_metrics(db, metrics_handle));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(address = %addr, "Mock product API is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
