use crate::{
    api::ApiResult,
    errors::ApiError,
    models::TransactionOutputRow,
    params::{hex_list, TX_HASH_LEN},
    server::state::AppState,
};
use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TransactionOutput {
    pub id: i64,
    /// Hex encoded output CBOR
    pub payload: String,
    pub address_id: i64,
    pub tx_id: i64,
    pub tx_hash: String,
    pub output_index: i32,
}

impl From<TransactionOutputRow> for TransactionOutput {
    fn from(row: TransactionOutputRow) -> Self {
        Self {
            id: row.id,
            payload: hex::encode(row.payload),
            address_id: row.address_id,
            tx_id: row.tx_id,
            tx_hash: hex::encode(row.tx_hash),
            output_index: row.output_index,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UtxosResponse {
    pub data: Vec<TransactionOutput>,
}

/// Outputs created by the given transactions.
#[utoipa::path(
    get,
    path = "/utxos-for-transactions",
    tag = "transactions",
    params(
        ("transactions" = Vec<String>, Query, description = "Hex encoded 32 byte transaction hashes, repeated or comma separated"),
    ),
    responses(
        (status = 200, description = "Outputs of the given transactions", body = UtxosResponse),
        (status = 400, description = "Missing `transactions`", body = ApiError),
        (status = 422, description = "Malformed `transactions`", body = ApiError),
    )
)]
pub async fn route(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<UtxosResponse> {
    let hashes = hex_list(
        query.as_deref(),
        "transactions",
        state.config.limits.max_query_items,
        Some(TX_HASH_LEN),
    )?;

    let rows = state.store.transaction_outputs(hashes).await?;

    Ok(Json(UtxosResponse {
        data: rows.into_iter().map(TransactionOutput::from).collect(),
    }))
}
