//! Request metrics for the note endpoints.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

use crate::error::{ApiError, Result};

pub struct Telemetry;

impl Telemetry {
    pub fn record_created() {
        counter!("echomap_notes_created_total").increment(1);
    }

    pub fn record_rejected(reason: &str) {
        counter!("echomap_notes_rejected_total", "reason" => reason.to_string()).increment(1);
    }

    pub fn record_listed(count: usize) {
        counter!("echomap_notes_listed_total").increment(1);
        histogram!("echomap_notes_list_size").record(count as f64);
    }

    pub fn record_latency(endpoint: &str, duration_ms: f64) {
        histogram!("echomap_request_duration_ms", "endpoint" => endpoint.to_string())
            .record(duration_ms);
    }
}

/// Records request latency when finished or dropped, so early returns on
/// error paths are still measured.
pub struct RequestTimer {
    start: Instant,
    endpoint: &'static str
}

impl RequestTimer {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint
        }
    }

    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64() * 1000.0;
        Telemetry::record_latency(self.endpoint, duration);
    }
}

/// Installs the global Prometheus recorder and returns a handle for rendering
/// the `/metrics` page.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Configuration(format!("Failed to install metrics recorder: {e}")))
}
