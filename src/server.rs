pub mod logging;
pub mod metrics;
pub mod routes;
pub mod state;

use crate::{
    config::Config,
    errors::{ApiError, AppError},
    health_monitor::{self, HealthMonitor},
    middlewares::errors::{error_middleware, handle_panic},
    store::ChainStore,
};
use axum::{middleware::from_fn, Extension, Router};
use metrics::{setup_metrics_recorder, spawn_process_collector};
use routes::get_api_routes;
use state::AppState;
use std::sync::Arc;
use tower::Layer;
use tower_http::{catch_panic::CatchPanicLayer, normalize_path::NormalizePathLayer};

/// Builds and configures the Axum `Router` on top of the given store.
/// Returns `Ok(Router)` on success or an `AppError` if a step fails.
pub async fn build(
    config: Arc<Config>,
    store: Arc<dyn ChainStore>,
) -> Result<(Router, HealthMonitor), AppError> {
    // Setting up the metrics recorder needs to be the very first step before
    // doing anything that uses metrics, or the initial data will be lost:
    let metrics_handle = if !config.no_metrics {
        let recorder = setup_metrics_recorder();
        spawn_process_collector();

        Some(recorder)
    } else {
        None
    };

    // Health monitor
    let health_monitor = health_monitor::spawn(store.clone()).await;

    let app_state = AppState {
        config: config.clone(),
        store,
    };

    // Add layers
    let inner = {
        let mut routes = get_api_routes(!config.no_metrics)
            .with_state(app_state)
            .layer(Extension(health_monitor.clone()))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(from_fn(error_middleware))
            .fallback(ApiError::not_found());

        if let Some(prom_handler) = metrics_handle {
            routes = routes.layer(Extension(prom_handler));
        }

        routes
    };

    let inner = NormalizePathLayer::trim_trailing_slash().layer(inner);
    let app = Router::new().fallback_service(inner);

    Ok((app, health_monitor))
}
