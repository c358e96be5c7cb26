use crate::{api::ApiResult, errors::ApiError, params::hex_list, server::state::AppState};
use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct AddressInUse {
    pub credential: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct AddressesInUseResponse {
    pub data: Vec<AddressInUse>,
}

/// Which of the given stake credentials have appeared in any transaction.
#[utoipa::path(
    get,
    path = "/check-addresses-in-use",
    tag = "addresses",
    params(
        ("addresses" = Vec<String>, Query, description = "Hex encoded stake credentials, repeated or comma separated"),
    ),
    responses(
        (status = 200, description = "Credentials that are in use", body = AddressesInUseResponse),
        (status = 400, description = "Missing `addresses`", body = ApiError),
        (status = 422, description = "Malformed `addresses`", body = ApiError),
    )
)]
pub async fn route(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<AddressesInUseResponse> {
    let credentials = hex_list(
        query.as_deref(),
        "addresses",
        state.config.limits.max_query_items,
        None,
    )?;

    let in_use = state.store.credentials_in_use(credentials).await?;

    Ok(Json(AddressesInUseResponse {
        data: in_use
            .into_iter()
            .map(|credential| AddressInUse {
                credential: hex::encode(credential),
            })
            .collect(),
    }))
}
