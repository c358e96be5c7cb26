use async_trait::async_trait;
use chain_lookup::{
    errors::ApiError,
    models::{BestBlockRow, TransactionHistoryRow, TransactionOutputRow},
    store::{ChainStore, StoreResult},
};

pub const CREDENTIAL_A: &str = "8200581c0a0b0c";
pub const CREDENTIAL_B: &str = "8200581c0d0e0f";
pub const CREDENTIAL_UNUSED: &str = "8200581cffffff";
pub const TX_HASH_1: &str = "1111111111111111111111111111111111111111111111111111111111111111";
pub const TX_HASH_2: &str = "2222222222222222222222222222222222222222222222222222222222222222";
pub const TX_HASH_3: &str = "3333333333333333333333333333333333333333333333333333333333333333";
pub const BLOCK_HASH: &str = "abababababababababababababababababababababababababababababababab";

/// In-memory stand-in for the indexer database.
#[derive(Default, Clone)]
pub struct MockStore {
    /// (credential, transaction) relations
    pub relations: Vec<(Vec<u8>, TransactionHistoryRow)>,
    pub outputs: Vec<TransactionOutputRow>,
    pub best_block: Option<BestBlockRow>,
    pub fail_lookups: bool,
    pub panic_on_outputs: bool,
}

fn tx(id: i64, hash: &str, height: i32, tx_index: i32) -> TransactionHistoryRow {
    TransactionHistoryRow {
        id,
        payload: vec![0x84, id as u8],
        hash: hex::decode(hash).unwrap(),
        tx_index,
        is_valid: true,
        height,
    }
}

fn output(id: i64, tx_id: i64, tx_hash: &str, output_index: i32) -> TransactionOutputRow {
    TransactionOutputRow {
        id,
        payload: vec![0x82, output_index as u8],
        address_id: 100 + id,
        tx_id,
        tx_hash: hex::decode(tx_hash).unwrap(),
        output_index,
    }
}

impl MockStore {
    /// Three transactions over two blocks; tx 2 involves both credentials.
    pub fn populated() -> Self {
        let a = hex::decode(CREDENTIAL_A).unwrap();
        let b = hex::decode(CREDENTIAL_B).unwrap();

        Self {
            relations: vec![
                (a.clone(), tx(3, TX_HASH_3, 11, 0)),
                (a.clone(), tx(2, TX_HASH_2, 10, 1)),
                (b.clone(), tx(2, TX_HASH_2, 10, 1)),
                (b, tx(1, TX_HASH_1, 10, 0)),
            ],
            outputs: vec![
                output(21, 2, TX_HASH_2, 1),
                output(10, 1, TX_HASH_1, 0),
                output(20, 2, TX_HASH_2, 0),
            ],
            best_block: Some(BestBlockRow {
                id: 7,
                height: 11,
                hash: hex::decode(BLOCK_HASH).unwrap(),
                epoch: 2,
                slot: 4321,
            }),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_lookups: true,
            ..Self::populated()
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_lookups {
            Err(ApiError::internal_server_error(
                "Database pool error: connection to postgres://reader:hunter2@db refused"
                    .to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainStore for MockStore {
    async fn transactions_history(
        &self,
        credentials: Vec<Vec<u8>>,
        limit: i64,
    ) -> StoreResult<Vec<TransactionHistoryRow>> {
        self.check()?;

        let mut rows: Vec<TransactionHistoryRow> = self
            .relations
            .iter()
            .filter(|(credential, _)| credentials.contains(credential))
            .map(|(_, row)| row.clone())
            .collect();

        rows.sort_by_key(|row| (row.height, row.tx_index));
        rows.dedup_by_key(|row| row.id);
        rows.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(rows)
    }

    async fn credentials_in_use(&self, credentials: Vec<Vec<u8>>) -> StoreResult<Vec<Vec<u8>>> {
        self.check()?;

        Ok(credentials
            .into_iter()
            .filter(|credential| self.relations.iter().any(|(c, _)| c == credential))
            .collect())
    }

    async fn transaction_outputs(
        &self,
        hashes: Vec<Vec<u8>>,
    ) -> StoreResult<Vec<TransactionOutputRow>> {
        if self.panic_on_outputs {
            panic!("row decoding blew up for postgres://reader:hunter2@db");
        }

        self.check()?;

        let mut rows: Vec<TransactionOutputRow> = self
            .outputs
            .iter()
            .filter(|row| hashes.contains(&row.tx_hash))
            .cloned()
            .collect();

        rows.sort_by_key(|row| (row.tx_id, row.output_index));

        Ok(rows)
    }

    async fn best_block(&self) -> StoreResult<Option<BestBlockRow>> {
        self.check()?;

        Ok(self.best_block.clone())
    }

    async fn transaction_count(&self) -> StoreResult<i64> {
        self.check()?;

        Ok(self.relations.len() as i64)
    }
}
