use crate::{
    api::{addresses_in_use, best_block, docs, metrics, root, transactions_history, utxos},
    middlewares::metrics::track_http_metrics,
    server::state::AppState,
};
use axum::{middleware::from_fn, routing::get, Router};

pub fn get_api_routes(enable_metrics: bool) -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(root::route))
        .route(
            "/transactions-history-for-addresses",
            get(transactions_history::route),
        )
        .route("/check-addresses-in-use", get(addresses_in_use::route))
        .route("/utxos-for-transactions", get(utxos::route))
        .route("/best-block", get(best_block::route))
        .route("/docs", get(docs::route))
        .route(docs::OPENAPI_PATH, get(docs::openapi));

    if enable_metrics {
        router = router
            .route("/metrics", get(metrics::route))
            .route_layer(from_fn(track_http_metrics));
    }

    router
}
