use crate::{
    errors::AppError,
    models::{BestBlockRow, TransactionHistoryRow, TransactionOutputRow},
    schema::{block, stake_credential, transaction, transaction_output, tx_credential_relation},
    store::{ChainStore, StoreResult},
};
use async_trait::async_trait;
use deadpool_diesel::postgres::{Manager, Pool};
use deadpool_diesel::Runtime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use metrics::counter;
use tracing::{info, warn};

/// [`ChainStore`] backed by a pool of PostgreSQL connections.
#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    /// Builds the pool and makes sure the database answers before the
    /// server starts accepting requests.
    pub async fn connect(database_url: &str, max_size: usize) -> Result<Self, AppError> {
        let manager = Manager::new(database_url, Runtime::Tokio1);
        let pool = Pool::builder(manager)
            .max_size(max_size)
            .build()
            .map_err(|e| AppError::Database(format!("Failed to create pool: {e}")))?;

        let store = Self { pool };
        let transactions = store
            .transaction_count()
            .await
            .map_err(|e| AppError::Database(e.message))?;

        info!(transactions, "Connected to the database");

        Ok(store)
    }

    async fn run<T, F>(&self, query: &'static str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        counter!("db_queries_total", "query" => query).increment(1);

        let result = self.interact(f).await;

        if let Err(e) = &result {
            counter!("db_query_errors_total", "query" => query).increment(1);
            warn!(query, "Query failed: {}", e.message);
        }

        result
    }

    async fn interact<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.pool.get().await?;
        let rows = conn.interact(f).await??;

        Ok(rows)
    }
}

#[async_trait]
impl ChainStore for PostgresStore {
    async fn transactions_history(
        &self,
        credentials: Vec<Vec<u8>>,
        limit: i64,
    ) -> StoreResult<Vec<TransactionHistoryRow>> {
        self.run("transactions_history", move |conn| {
            stake_credential::table
                .inner_join(
                    tx_credential_relation::table
                        .inner_join(transaction::table.inner_join(block::table)),
                )
                .filter(stake_credential::credential.eq_any(credentials))
                .select((
                    transaction::id,
                    transaction::payload,
                    transaction::hash,
                    transaction::tx_index,
                    transaction::is_valid,
                    block::height,
                ))
                // a transaction may relate to several of the requested credentials
                .distinct()
                .order((block::height.asc(), transaction::tx_index.asc()))
                .limit(limit)
                .load::<TransactionHistoryRow>(conn)
        })
        .await
    }

    async fn credentials_in_use(&self, credentials: Vec<Vec<u8>>) -> StoreResult<Vec<Vec<u8>>> {
        self.run("credentials_in_use", move |conn| {
            stake_credential::table
                .inner_join(tx_credential_relation::table.inner_join(transaction::table))
                .filter(stake_credential::credential.eq_any(credentials))
                .select(stake_credential::credential)
                .distinct()
                .load::<Vec<u8>>(conn)
        })
        .await
    }

    async fn transaction_outputs(
        &self,
        hashes: Vec<Vec<u8>>,
    ) -> StoreResult<Vec<TransactionOutputRow>> {
        self.run("transaction_outputs", move |conn| {
            transaction_output::table
                .inner_join(transaction::table)
                .filter(transaction::hash.eq_any(hashes))
                .select((
                    transaction_output::id,
                    transaction_output::payload,
                    transaction_output::address_id,
                    transaction_output::tx_id,
                    transaction::hash,
                    transaction_output::output_index,
                ))
                .order((
                    transaction_output::tx_id.asc(),
                    transaction_output::output_index.asc(),
                ))
                .load::<TransactionOutputRow>(conn)
        })
        .await
    }

    async fn best_block(&self) -> StoreResult<Option<BestBlockRow>> {
        self.run("best_block", |conn| {
            block::table
                .select((
                    block::id,
                    block::height,
                    block::hash,
                    block::epoch,
                    block::slot,
                ))
                .order(block::height.desc())
                .first::<BestBlockRow>(conn)
                .optional()
        })
        .await
    }

    async fn transaction_count(&self) -> StoreResult<i64> {
        self.run("transaction_count", |conn| {
            transaction::table.count().get_result::<i64>(conn)
        })
        .await
    }
}
