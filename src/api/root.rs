use crate::{api::best_block::BestBlock, health_monitor::HealthMonitor};
use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub revision: String,
    pub healthy: bool,
    pub best_block: Option<BestBlock>,
    pub errors: Vec<String>,
}

pub async fn route(Extension(health_monitor): Extension<HealthMonitor>) -> impl IntoResponse {
    let status = health_monitor.current_status().await;

    let http_status = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = RootResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        revision: env!("GIT_REVISION").to_string(),
        healthy: status.healthy,
        best_block: status.best_block,
        errors: status.errors,
    };

    (http_status, Json(response))
}
