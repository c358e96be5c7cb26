use crate::{api::ApiResult, errors::ApiError, models::BestBlockRow, server::state::AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct BestBlock {
    pub id: i32,
    pub height: i32,
    pub hash: String,
    pub epoch: i32,
    pub slot: i32,
}

impl From<BestBlockRow> for BestBlock {
    fn from(row: BestBlockRow) -> Self {
        Self {
            id: row.id,
            height: row.height,
            hash: hex::encode(row.hash),
            epoch: row.epoch,
            slot: row.slot,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct BestBlockResponse {
    /// `null` until the first block is indexed
    pub data: Option<BestBlock>,
}

/// The highest block indexed so far.
#[utoipa::path(
    get,
    path = "/best-block",
    tag = "blocks",
    responses(
        (status = 200, description = "Tip of the indexed chain", body = BestBlockResponse),
        (status = 500, description = "Database failure", body = ApiError),
    )
)]
pub async fn route(State(state): State<AppState>) -> ApiResult<BestBlockResponse> {
    let block = state.store.best_block().await?;

    Ok(Json(BestBlockResponse {
        data: block.map(BestBlock::from),
    }))
}
