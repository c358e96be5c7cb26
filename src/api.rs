pub mod addresses_in_use;
pub mod best_block;
pub mod docs;
pub mod metrics;
pub mod root;
pub mod transactions_history;
pub mod utxos;

pub use crate::types::ApiResult;
