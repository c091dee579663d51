use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and describe the request counters.
    pub fn init(history_capacity: usize) -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!(
            "chat_requests_total",
            "Chat replies served, labeled by reply source"
        );
        describe_counter!(
            "chat_emergency_total",
            "Chat messages stopped by the emergency gate"
        );
        describe_counter!(
            "predict_requests_total",
            "Symptom checker predictions served"
        );
        describe_counter!(
            "predict_emergency_total",
            "Checker inputs stopped by the emergency gate"
        );
        describe_gauge!(
            "exchange_history_capacity",
            "Configured capacity of the in-memory exchange history"
        );

        // Static gauge with the configured capacity.
        gauge!("exchange_history_capacity").set(history_capacity as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
