//! Prediction client metrics.
//!
//! - Request counters by operation and outcome
//! - Latency histograms by operation

use metrics::{counter, histogram};

/// Metric name constants.
pub mod names {
    /// Total requests by operation and outcome.
    pub const REQUESTS_TOTAL: &str = "predict_client_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "predict_client_latency_seconds";
}

/// Record metrics for a finished request.
pub fn record_request(operation: &'static str, outcome: &'static str, latency_secs: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation
    )
    .record(latency_secs);
}
