#![allow(dead_code)]

pub mod mock_store;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chain_lookup::{
    config::{Config, QueryLimits},
    health_monitor::HealthMonitor,
    server::build,
    store::ChainStore,
    types::LogLevel,
    AppError,
};
use std::sync::{Arc, LazyLock};
use tower::ServiceExt;

static INIT_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt::init();
});

pub fn initialize_logging() {
    LazyLock::force(&INIT_LOGGING);
}

pub fn test_config(limits: QueryLimits, no_metrics: bool) -> Arc<Config> {
    let config = Config {
        server_address: "0.0.0.0".parse().unwrap(),
        server_port: 4000,
        log_level: LogLevel::Info.into(),
        database_url: "postgres://unused@localhost/chain".to_string(),
        max_pool_connections: 1,
        limits,
        no_metrics,
        sentry_dsn: None,
    };

    Arc::new(config)
}

pub async fn build_app(store: impl ChainStore) -> Result<(Router, HealthMonitor), AppError> {
    build(test_config(QueryLimits::default(), true), Arc::new(store)).await
}

pub async fn build_app_with(
    store: impl ChainStore,
    limits: QueryLimits,
    no_metrics: bool,
) -> Result<(Router, HealthMonitor), AppError> {
    build(test_config(limits, no_metrics), Arc::new(store)).await
}

pub async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    (status, body.to_vec())
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Method::GET, uri).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).expect("Response body is not valid JSON");

    (status, json)
}
