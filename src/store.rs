use crate::{
    errors::ApiError,
    models::{BestBlockRow, TransactionHistoryRow, TransactionOutputRow},
};
use async_trait::async_trait;

pub type StoreResult<T> = Result<T, ApiError>;

/// Read-only access to the indexed chain.
///
/// Handlers only ever talk to this trait, so the HTTP layer can be exercised
/// against an in-memory implementation. [`crate::db::PostgresStore`] is the
/// production backend.
#[async_trait]
pub trait ChainStore: Send + Sync + 'static {
    /// Transactions related to any of `credentials`, oldest first
    /// (block height, then index within the block), at most `limit` rows.
    async fn transactions_history(
        &self,
        credentials: Vec<Vec<u8>>,
        limit: i64,
    ) -> StoreResult<Vec<TransactionHistoryRow>>;

    /// The subset of `credentials` referenced by at least one transaction.
    async fn credentials_in_use(&self, credentials: Vec<Vec<u8>>) -> StoreResult<Vec<Vec<u8>>>;

    /// Every output of the transactions with the given hashes.
    async fn transaction_outputs(
        &self,
        hashes: Vec<Vec<u8>>,
    ) -> StoreResult<Vec<TransactionOutputRow>>;

    /// The highest indexed block, if any.
    async fn best_block(&self) -> StoreResult<Option<BestBlockRow>>;

    async fn transaction_count(&self) -> StoreResult<i64>;
}
