//! Prometheus metrics for Neo4j repository operations

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, TextEncoder};
use std::time::Duration;

static NEO4J_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "follows_service_neo4j_operations_total",
            "Repository operations against Neo4j by outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("failed to create follows_service_neo4j_operations_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register follows_service_neo4j_operations_total");
    counter
});

static NEO4J_OPERATION_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "follows_service_neo4j_operation_duration_seconds",
            "Repository operation latencies against Neo4j",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["operation"],
    )
    .expect("failed to create follows_service_neo4j_operation_duration_seconds");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("failed to register follows_service_neo4j_operation_duration_seconds");
    histogram
});

/// Outcome label: "ok", "timeout", or the error kind
pub fn record_operation(operation: &str, outcome: &str, elapsed: Duration) {
    NEO4J_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    NEO4J_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}

pub async fn metrics_handler() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
