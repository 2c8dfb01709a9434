//! Prometheus metrics for the gateway
//!
//! Everything registers against the default registry and is exported by the
//! `/metrics` handler.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, register_int_gauge_vec,
    Histogram, HistogramVec, IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "catalog_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "catalog_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    // Search Metrics

    /// Product searches by outcome
    pub static ref SEARCH_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_search_requests_total",
        "Total number of product search requests by outcome",
        &["outcome"]
    )
    .expect("Failed to register SEARCH_REQUESTS_TOTAL");

    /// Records returned per successful search
    pub static ref SEARCH_RESULTS: Histogram = register_histogram!(
        "catalog_search_results",
        "Number of records returned by a product search",
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]
    )
    .expect("Failed to register SEARCH_RESULTS");

    // Backend Metrics

    /// Time spent waiting on the search engine
    pub static ref BACKEND_QUERY_DURATION_SECONDS: Histogram = register_histogram!(
        "catalog_backend_query_duration_seconds",
        "Search engine query duration in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register BACKEND_QUERY_DURATION_SECONDS");

    /// Search engine failures by kind
    pub static ref BACKEND_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_backend_errors_total",
        "Total number of failed search engine calls",
        &["kind"]
    )
    .expect("Failed to register BACKEND_ERRORS_TOTAL");
}

/// How a product search ended, for `catalog_search_requests_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Success,
    Unauthorized,
    Invalid,
    BackendError,
}

impl SearchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOutcome::Success => "success",
            SearchOutcome::Unauthorized => "unauthorized",
            SearchOutcome::Invalid => "invalid",
            SearchOutcome::BackendError => "backend_error",
        }
    }
}

pub fn record_search(outcome: SearchOutcome) {
    SEARCH_REQUESTS_TOTAL
        .with_label_values(&[outcome.as_str()])
        .inc();
}

/// Collapse request paths into a bounded label set.
///
/// Known routes keep their path; anything else becomes `/{other}` so that
/// scanners cannot blow up label cardinality.
pub fn sanitize_path(path: &str) -> String {
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    match trimmed {
        "" | "/" => "/".to_string(),
        "/health" | "/metrics" | "/favicon.ico" | "/v1/products" => trimmed.to_string(),
        _ => "/{other}".to_string(),
    }
}
