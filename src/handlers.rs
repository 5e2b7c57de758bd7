// =============================================================================
// HANDLERS MODULE
// =============================================================================
// HTTP request handlers for the mock product REST API.
//
// AXUM EXTRACTORS USED HERE:
// - State<T>: Access shared application state
// - Path<T>: Extract path parameters (/products/:id → id)
// - Json<T>: Parse JSON request body
//
// LEARNING NOTE:
// The mock deliberately serves the whole collection from GET /products: the
// dashboard filters, sorts and paginates on its side.
// =============================================================================

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::metrics;
use crate::models::*;
use crate::AppState;

// =============================================================================
// HEALTH CHECK ENDPOINT
// =============================================================================

/// Liveness probe
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "petshop-admin".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        products: state.db.count().await,
    })
}

// =============================================================================
// METRICS ENDPOINT
// =============================================================================
/// Prometheus metrics endpoint
///
/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

// =============================================================================
// PRODUCT API ENDPOINTS
// =============================================================================

/// Parse a path id, answering 404 for anything that isn't a UUID: an id that
/// can't exist is simply not found.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Product not found: {}", raw)))
}

/// Record metrics for a finished request, whatever its outcome
fn observe<T>(method: &str, endpoint: &str, start: Instant, ok_status: u16, result: &AppResult<T>) {
    let status = match result {
        Ok(_) => ok_status,
        Err(AppError::NotFound(_)) => 404,
        Err(AppError::BadRequest(_)) => 400,
        Err(AppError::Internal(_)) => 500,
    };
    metrics::record_http_request(method, endpoint, status, start.elapsed().as_secs_f64());
}

// -----------------------------------------------------------------------------
// LIST PRODUCTS
// -----------------------------------------------------------------------------
/// Full collection, in insertion order
///
/// GET /api/v1/products
pub async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    let start = Instant::now();

    let products = state.db.list_products().await;
    metrics::set_catalog_size(products.len());
    metrics::record_http_request(
        "GET",
        "/api/v1/products",
        200,
        start.elapsed().as_secs_f64(),
    );

    Json(products)
}

// -----------------------------------------------------------------------------
// GET SINGLE PRODUCT
// -----------------------------------------------------------------------------
/// GET /api/v1/products/:id
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let start = Instant::now();

    let result = match parse_id(&id) {
        Ok(id) => state.db.get_product(id).await,
        Err(e) => Err(e),
    };
    observe("GET", "/api/v1/products/:id", start, 200, &result);

    result.map(Json)
}

// -----------------------------------------------------------------------------
// CREATE PRODUCT
// -----------------------------------------------------------------------------
/// POST /api/v1/products
///
/// # Response
/// - 201 Created: the stored product
/// - 400 Bad Request: empty name, negative price or quantity
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let start = Instant::now();

    let result = state.db.create_product(draft).await;
    observe("POST", "/api/v1/products", start, 201, &result);

    let product = result?;
    metrics::set_catalog_size(state.db.count().await);
    tracing::info!(id = %product.id, name = %product.name, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

// -----------------------------------------------------------------------------
// UPDATE PRODUCT
// -----------------------------------------------------------------------------
/// PUT /api/v1/products/:id
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<Json<Product>> {
    let start = Instant::now();

    let result = match parse_id(&id) {
        Ok(id) => state.db.update_product(id, draft).await,
        Err(e) => Err(e),
    };
    observe("PUT", "/api/v1/products/:id", start, 200, &result);

    let product = result?;
    tracing::info!(id = %product.id, "Product updated");

    Ok(Json(product))
}

// -----------------------------------------------------------------------------
// DELETE PRODUCT
// -----------------------------------------------------------------------------
/// DELETE /api/v1/products/:id
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let start = Instant::now();

    let result = match parse_id(&id) {
        Ok(id) => state.db.delete_product(id).await,
        Err(e) => Err(e),
    };
    observe("DELETE", "/api/v1/products/:id", start, 204, &result);

    result?;
    metrics::set_catalog_size(state.db.count().await);
    tracing::info!(id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

// -----------------------------------------------------------------------------
// SET PRODUCT STATUS
// -----------------------------------------------------------------------------
/// PATCH /api/v1/products/:id/status
///
/// # Request Body
/// ```json
/// { "status": "inactive" }
/// ```
pub async fn set_product_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<Json<Product>> {
    let start = Instant::now();

    let result = match parse_id(&id) {
        Ok(id) => state.db.set_product_status(id, update.status).await,
        Err(e) => Err(e),
    };
    observe("PATCH", "/api/v1/products/:id/status", start, 200, &result);

    let product = result?;
    tracing::info!(id = %product.id, status = ?product.status, "Product status changed");

    Ok(Json(product))
}
