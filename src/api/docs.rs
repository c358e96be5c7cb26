use crate::api::{addresses_in_use, best_block, transactions_history, utxos};
use crate::errors::{ApiError, FieldError};
use axum::{response::Html, Json};
use utoipa::OpenApi;

pub const OPENAPI_PATH: &str = "/docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "chain-lookup",
        description = "Transaction history, address usage and UTXO lookups over an indexed chain database."
    ),
    paths(
        transactions_history::route,
        addresses_in_use::route,
        utxos::route,
        best_block::route,
    ),
    components(schemas(
        transactions_history::TransactionHistory,
        transactions_history::TransactionsHistoryResponse,
        addresses_in_use::AddressInUse,
        addresses_in_use::AddressesInUseResponse,
        utxos::TransactionOutput,
        utxos::UtxosResponse,
        best_block::BestBlock,
        best_block::BestBlockResponse,
        ApiError,
        FieldError,
    )),
    tags(
        (name = "transactions", description = "Transaction lookups"),
        (name = "addresses", description = "Stake credential lookups"),
        (name = "blocks", description = "Chain tip"),
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn route() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>chain-lookup API</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
    <script>
      window.onload = () => {{
        window.ui = SwaggerUIBundle({{ url: "{OPENAPI_PATH}", dom_id: "#swagger-ui" }});
      }};
    </script>
  </body>
</html>
"##
    ))
}
