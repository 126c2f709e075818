use serde::Deserialize;

use super::{PollError, PollResult, poll_chain};
use crate::chains::Chain;
use crate::config::TatumConfig;
use crate::model::MinedBlock;
use crate::store::BlockStore;

const SATS_PER_COIN: f64 = 100_000_000.0;

/// Standard coinbase-input sentinel: empty previous hash, max u32 index.
const COINBASE_PREVOUT_INDEX: u32 = u32::MAX;

/* ---------- Raw provider payload (Tatum v3 dogecoin schema) ---------- */

#[derive(Debug, Deserialize)]
struct TatumDogeTx {
    hash: String,
    block: Option<String>,
    #[serde(rename = "blockNumber")]
    block_number: Option<u64>,
    time: Option<i64>,
    #[serde(default)]
    inputs: Vec<DogeInput>,
    #[serde(default)]
    outputs: Vec<DogeOutput>,
}

#[derive(Debug, Deserialize)]
struct DogeInput {
    prevout: DogePrevout,
}

#[derive(Debug, Deserialize)]
struct DogePrevout {
    hash: String,
    index: u32,
}

#[derive(Debug, Deserialize)]
struct DogeOutput {
    value: String, // satoshis, as a decimal string
    #[serde(default)]
    address: String,
}

/* ---------- Adapter ---------- */

pub async fn poll(http: &reqwest::Client, cfg: &TatumConfig, store: &dyn BlockStore) -> PollResult {
    poll_chain(Chain::DogecoinTestnet, store, fetch_candidates(http, cfg)).await
}

pub async fn fetch_candidates(
    http: &reqwest::Client,
    cfg: &TatumConfig,
) -> Result<Vec<MinedBlock>, PollError> {
    let url = format!(
        "{}/transaction/address/{}?pageSize={}",
        cfg.api_url, cfg.address, cfg.page_size
    );
    let res = http.get(&url).header("x-api-key", &cfg.api_key).send().await?;
    if !res.status().is_success() {
        return Err(PollError::Status(res.status().as_u16()));
    }
    let txs: Vec<TatumDogeTx> = res.json().await?;
    Ok(extract_candidates(&txs, &cfg.address))
}

/// Coinbase-ness here is the prevout sentinel on the first input. The
/// provider's `block` field is already the block hash; output values are
/// satoshi strings.
fn extract_candidates(txs: &[TatumDogeTx], address: &str) -> Vec<MinedBlock> {
    txs.iter()
        .filter(|tx| {
            tx.inputs.first().is_some_and(|input| {
                input.prevout.hash.is_empty() && input.prevout.index == COINBASE_PREVOUT_INDEX
            })
        })
        .filter_map(|tx| {
            let (block_hash, block_height, block_time) =
                match (tx.block.clone(), tx.block_number, tx.time) {
                    (Some(hash), Some(height), Some(time)) => (hash, height, time),
                    _ => return None,
                };

            let output = tx
                .outputs
                .iter()
                .find(|out| out.address.eq_ignore_ascii_case(address))
                .or_else(|| tx.outputs.first());
            let reward = output
                .map_or(0.0, |out| out.value.parse::<f64>().unwrap_or(0.0) / SATS_PER_COIN);

            Some(MinedBlock {
                block_hash,
                block_height,
                block_time,
                reward,
                coinbase_txid: tx.hash.clone(),
                chain: Chain::DogecoinTestnet,
            })
        })
        .collect()
}
