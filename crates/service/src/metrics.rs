use std::time::Instant;

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

use crate::errors::StoreError;
use crate::store::Operation;

// Prometheus metrics (default registry)
pub static STORE_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ensino_store_operations_total",
        "Collection operations by resource, operation and outcome",
        &["resource", "operation", "outcome"]
    )
    .expect("register store_operations_total")
});

pub static STORE_OPERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ensino_store_operation_duration_seconds",
        "Collection operation duration in seconds, lock wait included",
        &["resource", "operation"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("register store_operation_duration")
});

pub fn observe<T>(resource: &str, op: Operation, started: Instant, result: &Result<T, StoreError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[resource, op.as_str(), outcome])
        .inc();
    STORE_OPERATION_DURATION
        .with_label_values(&[resource, op.as_str()])
        .observe(started.elapsed().as_secs_f64());
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
