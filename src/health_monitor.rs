use crate::{api::best_block::BestBlock, store::ChainStore};
use metrics::gauge;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tokio::time::{self, Duration};
use tracing::warn;

/// Reason published under `GET /` while the store cannot be queried.
pub const DATABASE_UNAVAILABLE: &str = "database unavailable";

#[derive(Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub errors: Vec<String>,
    pub best_block: Option<BestBlock>,
}

#[derive(Clone)]
pub struct HealthMonitor {
    inner: Arc<RwLock<HealthStatus>>,
}

impl HealthMonitor {
    pub async fn current_status(&self) -> HealthStatus {
        self.inner.read().await.clone()
    }
}

async fn check(store: &dyn ChainStore) -> HealthStatus {
    match store.best_block().await {
        Ok(best_block) => HealthStatus {
            healthy: true,
            errors: vec![],
            best_block: best_block.map(BestBlock::from),
        },
        Err(err) => {
            warn!("Health check failed: {}", err.message);

            HealthStatus {
                healthy: false,
                errors: vec![DATABASE_UNAVAILABLE.to_string()],
                best_block: None,
            }
        },
    }
}

/// Polls the store in the background. Returns once the first status is known.
pub async fn spawn(store: Arc<dyn ChainStore>) -> HealthMonitor {
    // This initial state is never seen:
    let state_ = Arc::new(RwLock::new(HealthStatus {
        healthy: false,
        errors: vec![],
        best_block: None,
    }));
    let state = state_.clone();

    let state_update_ = Arc::new(Notify::new());
    let state_update = state_update_.clone();

    tokio::spawn(async move {
        loop {
            let status = check(store.as_ref()).await;
            let healthy = status.healthy;

            gauge!("health_errors_total").set(status.errors.len() as f64);
            *(state.write().await) = status;

            state_update.notify_one();

            // Set delay based on health status
            let delay = Duration::from_secs(if healthy { 10 } else { 2 });
            time::sleep(delay).await;
        }
    });

    state_update_.notified().await;

    HealthMonitor { inner: state_ }
}
