//! Prometheus metrics for the portal.

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("metric can be created");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("collector can be registered");
    counter
});

pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )
    .expect("metric can be created");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("collector can be registered");
    histogram
});

/// Gateway call latency by operation (sign_in, find_client, ...).
pub static GATEWAY_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "portal_gateway_request_duration_seconds",
            "Identity and data gateway call duration in seconds",
        ),
        &["operation"],
    )
    .expect("metric can be created");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("collector can be registered");
    histogram
});

/// Dashboard renders by outcome: ok, degraded, no_client, unauthorized.
pub static DASHBOARD_RENDERS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("portal_dashboard_renders_total", "Dashboard renders by outcome"),
        &["outcome"],
    )
    .expect("metric can be created");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("collector can be registered");
    counter
});

/// Register every collector up front so `/metrics` lists them before first use.
pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION_SECONDS);
    Lazy::force(&GATEWAY_REQUEST_DURATION_SECONDS);
    Lazy::force(&DASHBOARD_RENDERS_TOTAL);
}

pub fn get_metrics() -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_recorded_dashboard_renders() {
        init_metrics();
        DASHBOARD_RENDERS_TOTAL.with_label_values(&["ok"]).inc();

        let text = get_metrics().unwrap();
        assert!(text.contains("portal_dashboard_renders_total"));
        assert!(text.contains("outcome=\"ok\""));
    }
}
