use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::{sync::OnceLock, time::Duration};
use tokio::sync::RwLock;

pub fn spawn_process_collector() {
    tokio::spawn(async {
        let collector = metrics_process::Collector::default();
        collector.describe();

        loop {
            collector.collect();
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}

// to prevent multiple initialization of the metrics recorder, happens in tests
static HANDLER: OnceLock<Arc<RwLock<PrometheusHandle>>> = OnceLock::new();

pub fn setup_metrics_recorder() -> Arc<RwLock<PrometheusHandle>> {
    HANDLER.get_or_init(internal_setup).clone()
}

fn internal_setup() -> Arc<RwLock<PrometheusHandle>> {
    let builder = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Note: we’re initializing with 0, otherwise they’re not present
    // under `GET /metrics` right after startup, before anything happens.

    describe_gauge!(
        "health_errors_total",
        "The number of currently happening health errors; see details under GET /"
    );
    gauge!("health_errors_total").set(0);

    describe_counter!("http_requests_total", "HTTP calls made to chain-lookup API");
    counter!("http_requests_total").absolute(0);

    describe_counter!(
        "db_queries_total",
        "Database queries issued, labelled by query"
    );

    describe_counter!(
        "db_query_errors_total",
        "Database queries that failed, labelled by query"
    );

    Arc::new(RwLock::new(builder))
}
