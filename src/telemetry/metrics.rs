//! Prometheus metrics setup and metric definitions

use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Register metric descriptions so Prometheus output carries HELP/TYPE
/// lines from startup, not just after first use.
pub fn describe_metrics() {
    describe_counter!(
        "idp_registry_operations_total",
        "Total number of identity provider registry write operations"
    );
}
