use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

static METRICS: OnceLock<PortalMetrics> = OnceLock::new();

pub struct PortalMetrics {
    registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub backend_requests_total: IntCounterVec,
}

impl PortalMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let backend_requests_total = IntCounterVec::new(
            Opts::new(
                "backend_requests_total",
                "Calls made to the document backend, by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(backend_requests_total.clone()))
            .expect("collector can be registered");

        Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            backend_requests_total,
        }
    }
}

/// Process-wide metrics, created on first use.
pub fn metrics() -> &'static PortalMetrics {
    METRICS.get_or_init(PortalMetrics::new)
}

pub fn record_backend_call(endpoint: &str, outcome: &str) {
    metrics()
        .backend_requests_total
        .with_label_values(&[endpoint, outcome])
        .inc();
}

/// Prometheus text exposition of every registered metric.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let metric_families = metrics().registry.gather();
    if let Err(e) = TextEncoder::new().encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
