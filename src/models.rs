use diesel::prelude::*;

/// A transaction touching one of the requested stake credentials, together
/// with the height of the block that contains it.
#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct TransactionHistoryRow {
    pub id: i64,
    pub payload: Vec<u8>,
    pub hash: Vec<u8>,
    pub tx_index: i32,
    pub is_valid: bool,
    pub height: i32,
}

#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutputRow {
    pub id: i64,
    pub payload: Vec<u8>,
    pub address_id: i64,
    pub tx_id: i64,
    pub tx_hash: Vec<u8>,
    pub output_index: i32,
}

#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct BestBlockRow {
    pub id: i32,
    pub height: i32,
    pub hash: Vec<u8>,
    pub epoch: i32,
    pub slot: i32,
}
