use serde::{Deserialize, Serialize};

use crate::chains::Chain;

/// Canonical record for one mined block, chain-agnostic.
/// `block_hash` is the dedup key; `reward` is always whole coins, never
/// satoshis — each adapter normalizes before emitting one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinedBlock {
    pub block_hash: String,
    pub block_height: u64,
    pub block_time: i64, // Unix timestamp (UTC)
    pub reward: f64,
    pub coinbase_txid: String,
    pub chain: Chain,
}
