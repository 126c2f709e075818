use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

use super::{BlockStore, StoreError};
use crate::chains::Chain;
use crate::model::MinedBlock;

/// In-memory reference store: blocks keyed by hash, prices keyed by chain.
/// The hash map entry API gives the insert-if-absent guarantee; everything
/// happens under a short lock, so first writer always wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blocks: Mutex<HashMap<String, MinedBlock>>,
    prices: Mutex<HashMap<Chain, f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("mutex poisoned".to_string())
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn block_exists(&self, block_hash: &str) -> Result<bool, StoreError> {
        let blocks = self.blocks.lock().map_err(|_| poisoned())?;
        Ok(blocks.contains_key(block_hash))
    }

    async fn has_coinbase_txid(&self, txid: &str) -> Result<bool, StoreError> {
        let blocks = self.blocks.lock().map_err(|_| poisoned())?;
        Ok(blocks.values().any(|b| b.coinbase_txid == txid))
    }

    async fn insert_block(&self, block: MinedBlock) -> bool {
        // A poisoned lock counts as an insertion failure, not a panic.
        let Ok(mut blocks) = self.blocks.lock() else {
            return false;
        };
        match blocks.entry(block.block_hash.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(block);
                true
            }
        }
    }

    async fn blocks(&self, chain: Option<Chain>) -> Result<Vec<MinedBlock>, StoreError> {
        let blocks = self.blocks.lock().map_err(|_| poisoned())?;
        let mut out: Vec<MinedBlock> = blocks
            .values()
            .filter(|b| chain.is_none_or(|c| b.chain == c))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.block_time.cmp(&a.block_time));
        Ok(out)
    }

    async fn upsert_price(&self, chain: Chain, price_usd: f64) -> Result<(), StoreError> {
        let mut prices = self.prices.lock().map_err(|_| poisoned())?;
        prices.insert(chain, price_usd);
        Ok(())
    }

    async fn prices(&self) -> Result<HashMap<Chain, f64>, StoreError> {
        let prices = self.prices.lock().map_err(|_| poisoned())?;
        Ok(prices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(hash: &str, time: i64, chain: Chain) -> MinedBlock {
        MinedBlock {
            block_hash: hash.into(),
            block_height: 100,
            block_time: time,
            reward: 1.0,
            coinbase_txid: format!("txid-{hash}"),
            chain,
        }
    }

    #[actix_web::test]
    async fn insert_is_first_writer_wins() {
        let store = MemoryStore::new();
        let first = block("h1", 10, Chain::DogecoinTestnet);
        let mut second = block("h1", 10, Chain::DogecoinTestnet);
        second.reward = 99.0;

        assert!(store.insert_block(first).await);
        assert!(!store.insert_block(second).await);

        let stored = store.blocks(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].reward, 1.0);
    }

    #[actix_web::test]
    async fn blocks_sorted_newest_first_and_filterable() {
        let store = MemoryStore::new();
        store.insert_block(block("a", 100, Chain::LitecoinTestnet)).await;
        store.insert_block(block("b", 300, Chain::DogecoinTestnet)).await;
        store.insert_block(block("c", 200, Chain::LitecoinTestnet)).await;

        let all = store.blocks(None).await.unwrap();
        let times: Vec<i64> = all.iter().map(|b| b.block_time).collect();
        assert_eq!(times, vec![300, 200, 100]);

        let ltc = store.blocks(Some(Chain::LitecoinTestnet)).await.unwrap();
        assert_eq!(ltc.len(), 2);
        assert!(ltc.iter().all(|b| b.chain == Chain::LitecoinTestnet));
    }

    #[actix_web::test]
    async fn coinbase_txid_lookup_sees_stored_blocks() {
        let store = MemoryStore::new();
        store.insert_block(block("a", 1, Chain::RavencoinTestnet)).await;

        assert!(store.has_coinbase_txid("txid-a").await.unwrap());
        assert!(!store.has_coinbase_txid("txid-z").await.unwrap());
    }

    #[actix_web::test]
    async fn price_upsert_is_latest_wins() {
        let store = MemoryStore::new();
        store.upsert_price(Chain::BcashTestnet, 250.0).await.unwrap();
        store.upsert_price(Chain::BcashTestnet, 260.5).await.unwrap();

        let prices = store.prices().await.unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[&Chain::BcashTestnet], 260.5);
    }
}
