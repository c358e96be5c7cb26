use crate::{
    api::ApiResult, errors::ApiError, models::TransactionHistoryRow, params::hex_list,
    server::state::AppState,
};
use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TransactionHistory {
    pub id: i64,
    /// Hex encoded transaction CBOR
    pub payload: String,
    pub hash: String,
    pub tx_index: i32,
    pub is_valid: bool,
    /// Height of the containing block
    pub height: i32,
}

impl From<TransactionHistoryRow> for TransactionHistory {
    fn from(row: TransactionHistoryRow) -> Self {
        Self {
            id: row.id,
            payload: hex::encode(row.payload),
            hash: hex::encode(row.hash),
            tx_index: row.tx_index,
            is_valid: row.is_valid,
            height: row.height,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TransactionsHistoryResponse {
    pub data: Vec<TransactionHistory>,
}

/// Transactions involving any of the given stake credentials, oldest first.
#[utoipa::path(
    get,
    path = "/transactions-history-for-addresses",
    tag = "transactions",
    params(
        ("addresses" = Vec<String>, Query, description = "Hex encoded stake credentials, repeated or comma separated"),
    ),
    responses(
        (status = 200, description = "Matching transactions", body = TransactionsHistoryResponse),
        (status = 400, description = "Missing `addresses`", body = ApiError),
        (status = 422, description = "Malformed `addresses`", body = ApiError),
    )
)]
pub async fn route(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<TransactionsHistoryResponse> {
    let limits = state.config.limits;
    let credentials = hex_list(query.as_deref(), "addresses", limits.max_query_items, None)?;

    let rows = state
        .store
        .transactions_history(credentials, limits.history_limit)
        .await?;

    Ok(Json(TransactionsHistoryResponse {
        data: rows.into_iter().map(TransactionHistory::from).collect(),
    }))
}
