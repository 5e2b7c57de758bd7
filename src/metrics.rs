// =============================================================================
// METRICS MODULE
// =============================================================================
// Prometheus metrics for the mock server and the catalog view engine.
//
// LEARNING NOTES:
// - The `metrics` macros are no-ops until a recorder is installed, so library
//   code can record freely; only the binary installs the Prometheus recorder
// - Counter: only goes up. Gauge: up or down. Histogram: distribution.
// =============================================================================

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

// =============================================================================
// METRIC NAMES
// =============================================================================

/// HTTP request counter
/// Labels: method, endpoint, status
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// HTTP request duration histogram
/// Labels: method, endpoint
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Number of products held by the mock backend
pub const CATALOG_PRODUCTS: &str = "catalog_products";

/// Catalog view recomputations (filter/sort/paginate passes)
pub const CATALOG_VIEW_RECOMPUTES_TOTAL: &str = "catalog_view_recomputes_total";

/// Image resolution outcomes
/// Labels: outcome (succeeded/fallback/exhausted/retry)
pub const CATALOG_IMAGE_EVENTS_TOTAL: &str = "catalog_image_events_total";

// =============================================================================
// SETUP FUNCTION
// =============================================================================
/// Install the Prometheus recorder globally and return its render handle.
///
/// Must be called at most once per process.
pub fn setup_metrics() -> Result<PrometheusHandle> {
    // 1ms .. 10s, sized for a local mock server
    let latency_buckets = &[
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            latency_buckets,
        )?
        .install_recorder()?;

    describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests received");
    describe_histogram!(HTTP_REQUEST_DURATION_SECONDS, "HTTP request latency in seconds");
    describe_gauge!(CATALOG_PRODUCTS, "Products currently held by the mock backend");
    describe_counter!(
        CATALOG_VIEW_RECOMPUTES_TOTAL,
        "Catalog view filter/sort/paginate passes"
    );
    describe_counter!(
        CATALOG_IMAGE_EVENTS_TOTAL,
        "Image resolution state transitions by outcome"
    );

    Ok(handle)
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Record an HTTP request
pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .record(duration_secs);
}

/// Update the backend product count gauge
pub fn set_catalog_size(count: usize) {
    gauge!(CATALOG_PRODUCTS).set(count as f64);
}

/// Count one catalog view recomputation
pub fn record_view_recompute() {
    counter!(CATALOG_VIEW_RECOMPUTES_TOTAL).increment(1);
}

/// Count one image resolver transition
pub fn record_image_event(outcome: &'static str) {
    counter!(CATALOG_IMAGE_EVENTS_TOTAL, "outcome" => outcome).increment(1);
}
