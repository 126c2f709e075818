mod memory;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::chains::Chain;
use crate::model::MinedBlock;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence port for mined blocks and spot prices.
///
/// The store owns dedup correctness: `block_hash` is unique, and concurrent
/// inserts of the same hash must resolve first-writer-wins. Callers treat a
/// losing insert as a no-op, never as an error.
#[async_trait]
pub trait BlockStore: Send + Sync {
    async fn block_exists(&self, block_hash: &str) -> Result<bool, StoreError>;

    /// Secondary lookup: has any stored block (resolved hash or not) been
    /// credited to this coinbase transaction?
    async fn has_coinbase_txid(&self, txid: &str) -> Result<bool, StoreError>;

    /// Insert-if-absent. Returns true only when the block was newly stored;
    /// a duplicate hash or a backend failure both yield false.
    async fn insert_block(&self, block: MinedBlock) -> bool;

    /// All stored blocks, optionally filtered by chain, newest first.
    async fn blocks(&self, chain: Option<Chain>) -> Result<Vec<MinedBlock>, StoreError>;

    /// Latest-wins spot price, one row per chain, no history.
    async fn upsert_price(&self, chain: Chain, price_usd: f64) -> Result<(), StoreError>;

    async fn prices(&self) -> Result<HashMap<Chain, f64>, StoreError>;
}
