use prometheus::{Encoder, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static DIAGNOSES_COMPLETED_TOTAL: OnceLock<IntCounter> = OnceLock::new();
pub static QUESTIONS_SERVED_TOTAL: OnceLock<IntCounter> = OnceLock::new();

pub fn init_metrics() {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("metric can be created");

    let request_duration = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )
    .expect("metric can be created");

    let diagnoses_completed = IntCounter::new(
        "diagnoses_completed_total",
        "Questionnaire walks that reached a leaf and returned a final result",
    )
    .expect("metric can be created");

    let questions_served = IntCounter::new(
        "questions_served_total",
        "Follow-up questions returned to clients",
    )
    .expect("metric can be created");

    registry
        .register(Box::new(requests_total.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(request_duration.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(diagnoses_completed.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(questions_served.clone()))
        .expect("collector can be registered");

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = DIAGNOSES_COMPLETED_TOTAL.set(diagnoses_completed);
    let _ = QUESTIONS_SERVED_TOTAL.set(questions_served);
}

pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };
    let metric_families = registry.gather();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
