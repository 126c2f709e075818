use futures::future::join_all;
use log::warn;
use serde::Deserialize;

use super::{PollError, PollResult};
use crate::chains::Chain;
use crate::config::RavencoinConfig;
use crate::model::MinedBlock;
use crate::rpc::RpcClient;
use crate::store::{BlockStore, StoreError};

/// Hash prefix for blocks whose `getblockhash` lookup failed. The coinbase
/// txid is appended so unresolved blocks never collide with each other in
/// the store.
const UNRESOLVED_HASH_PREFIX: &str = "unknown:";

fn unresolved_hash(txid: &str) -> String {
    format!("{UNRESOLVED_HASH_PREFIX}{txid}")
}

/* ---------- Raw provider payload (cryptoscope getaddress schema) ---------- */

#[derive(Debug, Deserialize)]
struct RvnAddressResponse {
    #[serde(default)]
    last_txs: Vec<RvnTx>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RvnTx {
    tx_time: i64,
    block_ix: u64,
    txid: String,
    amount: String, // whole coins, as a decimal string
    #[serde(default)]
    is_reward: bool,
}

/* ---------- Adapter ---------- */

/// The provider flags reward transactions but only reports a block index,
/// so each candidate needs a `getblockhash` round-trip. An RPC failure is
/// not fatal: the block is stored anyway under an unresolved-hash sentinel.
pub async fn poll(
    http: &reqwest::Client,
    cfg: &RavencoinConfig,
    store: &dyn BlockStore,
) -> PollResult {
    let chain = Chain::RavencoinTestnet;
    match poll_inner(http, cfg, store).await {
        Ok((fetched, new_blocks)) => PollResult { chain, fetched, new_blocks, error: None },
        Err(e) => PollResult { chain, fetched: 0, new_blocks: 0, error: Some(e.to_string()) },
    }
}

async fn poll_inner(
    http: &reqwest::Client,
    cfg: &RavencoinConfig,
    store: &dyn BlockStore,
) -> Result<(usize, usize), PollError> {
    let reward_txs = fetch_reward_txs(http, cfg).await?;
    let rpc = RpcClient::new(http, cfg);

    let mut new_blocks = 0;
    for tx in &reward_txs {
        // Already credited (resolved or not) - skip the RPC round-trip.
        if store.has_coinbase_txid(&tx.txid).await? {
            continue;
        }
        let resolved = match rpc.get_block_hash(tx.block_ix).await {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!("POLL ravencoin-testnet - getblockhash {} failed: {e}", tx.block_ix);
                None
            }
        };
        if persist_candidate(store, tx, resolved).await? {
            new_blocks += 1;
        }
    }
    Ok((reward_txs.len(), new_blocks))
}

/// Live (store-free) variant for the transactions endpoint: hashes are
/// resolved concurrently, falling back to the unresolved sentinel.
pub async fn fetch_candidates(
    http: &reqwest::Client,
    cfg: &RavencoinConfig,
) -> Result<Vec<MinedBlock>, PollError> {
    let reward_txs = fetch_reward_txs(http, cfg).await?;
    let rpc = RpcClient::new(http, cfg);
    let hashes = join_all(reward_txs.iter().map(|tx| rpc.get_block_hash(tx.block_ix))).await;

    Ok(reward_txs
        .iter()
        .zip(hashes)
        .map(|(tx, hash)| to_block(tx, hash.unwrap_or_else(|_| unresolved_hash(&tx.txid))))
        .collect())
}

async fn fetch_reward_txs(
    http: &reqwest::Client,
    cfg: &RavencoinConfig,
) -> Result<Vec<RvnTx>, PollError> {
    let url = format!("{}/getaddress/?address={}", cfg.explorer_api_url, cfg.address);
    let res = http.get(&url).send().await?;

    // The explorer serves an HTML error page when it is struggling; treat
    // anything that is not a JSON 2xx as unavailable.
    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !res.status().is_success() || !content_type.contains("application/json") {
        return Err(PollError::Unavailable);
    }

    let data: RvnAddressResponse = res.json().await?;
    Ok(data.last_txs.into_iter().filter(|tx| tx.is_reward).collect())
}

/// Dedup-then-insert for one reward transaction. The coinbase txid is the
/// dedup key whenever the hash is (or previously was) unresolved, so a later
/// successful resolution never duplicates an earlier sentinel row.
pub(crate) async fn persist_candidate(
    store: &dyn BlockStore,
    tx: &RvnTx,
    resolved: Option<String>,
) -> Result<bool, StoreError> {
    if store.has_coinbase_txid(&tx.txid).await? {
        return Ok(false);
    }
    let block_hash = match resolved {
        Some(hash) => {
            if store.block_exists(&hash).await? {
                return Ok(false);
            }
            hash
        }
        None => unresolved_hash(&tx.txid),
    };
    Ok(store.insert_block(to_block(tx, block_hash)).await)
}

fn to_block(tx: &RvnTx, block_hash: String) -> MinedBlock {
    MinedBlock {
        block_hash,
        block_height: tx.block_ix,
        block_time: tx.tx_time,
        reward: tx.amount.parse().unwrap_or(0.0),
        coinbase_txid: tx.txid.clone(),
        chain: Chain::RavencoinTestnet,
    }
}
