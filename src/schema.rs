// Read-only view of the indexer schema. The tables are owned and migrated by
// the indexer; only the columns queried here are declared.

diesel::table! {
    #[sql_name = "Block"]
    block (id) {
        id -> Int4,
        hash -> Bytea,
        height -> Int4,
        epoch -> Int4,
        slot -> Int4,
    }
}

diesel::table! {
    #[sql_name = "Transaction"]
    transaction (id) {
        id -> Int8,
        hash -> Bytea,
        block_id -> Int4,
        tx_index -> Int4,
        payload -> Bytea,
        is_valid -> Bool,
    }
}

diesel::table! {
    #[sql_name = "TransactionOutput"]
    transaction_output (id) {
        id -> Int8,
        payload -> Bytea,
        address_id -> Int8,
        tx_id -> Int8,
        output_index -> Int4,
    }
}

diesel::table! {
    #[sql_name = "StakeCredential"]
    stake_credential (id) {
        id -> Int8,
        credential -> Bytea,
    }
}

diesel::table! {
    #[sql_name = "TxCredentialRelation"]
    tx_credential_relation (tx_id, credential_id) {
        credential_id -> Int8,
        tx_id -> Int8,
        relation -> Int4,
    }
}

diesel::joinable!(transaction -> block (block_id));
diesel::joinable!(transaction_output -> transaction (tx_id));
diesel::joinable!(tx_credential_relation -> stake_credential (credential_id));
diesel::joinable!(tx_credential_relation -> transaction (tx_id));

diesel::allow_tables_to_appear_in_same_query!(
    block,
    transaction,
    transaction_output,
    stake_credential,
    tx_credential_relation,
);
