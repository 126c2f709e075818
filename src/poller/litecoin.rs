use serde::Deserialize;

use super::{PollError, PollResult, poll_chain};
use crate::chains::Chain;
use crate::config::EsploraConfig;
use crate::model::MinedBlock;
use crate::store::BlockStore;

const SATS_PER_COIN: f64 = 100_000_000.0;

/* ---------- Raw provider payload (Esplora address-txs schema) ---------- */

#[derive(Debug, Deserialize)]
struct EsploraTx {
    txid: String,
    status: EsploraStatus,
    vin: Vec<EsploraVin>,
    vout: Vec<EsploraVout>,
}

#[derive(Debug, Deserialize)]
struct EsploraStatus {
    block_hash: Option<String>,
    block_height: Option<u64>,
    block_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct EsploraVin {
    #[serde(default)]
    is_coinbase: bool,
}

#[derive(Debug, Deserialize)]
struct EsploraVout {
    value: u64, // satoshis
    #[serde(default)]
    scriptpubkey_address: Option<String>,
    #[serde(default)]
    scriptpubkey_type: String,
}

/* ---------- Adapter ---------- */

pub async fn poll(
    http: &reqwest::Client,
    cfg: &EsploraConfig,
    store: &dyn BlockStore,
) -> PollResult {
    poll_chain(Chain::LitecoinTestnet, store, fetch_candidates(http, cfg)).await
}

/// Fetch recent address activity and normalize the coinbase transactions.
pub async fn fetch_candidates(
    http: &reqwest::Client,
    cfg: &EsploraConfig,
) -> Result<Vec<MinedBlock>, PollError> {
    let url = format!("{}/address/{}/txs", cfg.api_url, cfg.address);
    let res = http.get(&url).send().await?;
    if !res.status().is_success() {
        return Err(PollError::Status(res.status().as_u16()));
    }
    let txs: Vec<EsploraTx> = res.json().await?;
    Ok(extract_candidates(&txs, &cfg.address))
}

/// The provider flags coinbase inputs explicitly (`vin[0].is_coinbase`).
/// Reward output: the one paying the tracked address, skipping op_return
/// outputs, falling back to the first spendable output. Values arrive in
/// satoshis.
fn extract_candidates(txs: &[EsploraTx], address: &str) -> Vec<MinedBlock> {
    txs.iter()
        .filter(|tx| tx.vin.first().is_some_and(|vin| vin.is_coinbase))
        .filter_map(|tx| {
            let (block_hash, block_height, block_time) = match (
                tx.status.block_hash.clone(),
                tx.status.block_height,
                tx.status.block_time,
            ) {
                (Some(hash), Some(height), Some(time)) => (hash, height, time),
                _ => return None, // not confirmed into a block yet
            };

            let spendable: Vec<&EsploraVout> = tx
                .vout
                .iter()
                .filter(|out| out.scriptpubkey_type != "op_return")
                .collect();
            let output = spendable
                .iter()
                .find(|out| {
                    out.scriptpubkey_address
                        .as_deref()
                        .is_some_and(|a| a.eq_ignore_ascii_case(address))
                })
                .or_else(|| spendable.first());
            let reward = output.map_or(0.0, |out| out.value as f64 / SATS_PER_COIN);

            Some(MinedBlock {
                block_hash,
                block_height,
                block_time,
                reward,
                coinbase_txid: tx.txid.clone(),
                chain: Chain::LitecoinTestnet,
            })
        })
        .collect()
}
