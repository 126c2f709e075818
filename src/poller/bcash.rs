use serde::Deserialize;

use super::{PollError, PollResult, poll_chain};
use crate::chains::Chain;
use crate::config::TatumConfig;
use crate::model::MinedBlock;
use crate::store::BlockStore;

/* ---------- Raw provider payload (Tatum v3 bcash schema) ---------- */

#[derive(Debug, Deserialize)]
struct TatumBchTx {
    txid: String,
    blockhash: Option<String>,
    blockheight: Option<u64>,
    blocktime: Option<i64>,
    #[serde(default)]
    vin: Vec<BchVin>,
    #[serde(default)]
    vout: Vec<BchVout>,
}

#[derive(Debug, Deserialize)]
struct BchVin {
    #[serde(default)]
    coinbase: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BchVout {
    value: f64, // whole coins
    #[serde(rename = "scriptPubKey")]
    script_pub_key: BchScriptPubKey,
}

#[derive(Debug, Deserialize)]
struct BchScriptPubKey {
    #[serde(default)]
    addresses: Option<Vec<String>>,
}

/* ---------- Adapter ---------- */

pub async fn poll(http: &reqwest::Client, cfg: &TatumConfig, store: &dyn BlockStore) -> PollResult {
    poll_chain(Chain::BcashTestnet, store, fetch_candidates(http, cfg)).await
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
    let txs: Vec<TatumBchTx> = res.json().await?;
    Ok(extract_candidates(&txs, &cfg.address))
}

/// A coinbase here is a non-empty `coinbase` script on the first input.
/// Provider addresses come without the cashaddr prefix, so the tracked
/// address is matched by substring with its `bchtest:` prefix stripped.
/// Values are already whole coins.
fn extract_candidates(txs: &[TatumBchTx], address: &str) -> Vec<MinedBlock> {
    let needle = address
        .strip_prefix("bchtest:")
        .unwrap_or(address)
        .to_lowercase();

    txs.iter()
        .filter(|tx| {
            tx.vin
                .first()
                .is_some_and(|vin| vin.coinbase.as_deref().is_some_and(|c| !c.is_empty()))
        })
        .filter_map(|tx| {
            let (block_hash, block_height, block_time) =
                match (tx.blockhash.clone(), tx.blockheight, tx.blocktime) {
                    (Some(hash), Some(height), Some(time)) => (hash, height, time),
                    _ => return None,
                };

            let output = tx
                .vout
                .iter()
                .find(|out| {
                    out.script_pub_key.addresses.as_deref().is_some_and(|addrs| {
                        addrs.iter().any(|a| a.to_lowercase().contains(&needle))
                    })
                })
                .or_else(|| tx.vout.first());
            let reward = output.map_or(0.0, |out| out.value);

            Some(MinedBlock {
                block_hash,
                block_height,
                block_time,
                reward,
                coinbase_txid: tx.txid.clone(),
                chain: Chain::BcashTestnet,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "bchtest:qq2mudwqwfcel7aah0jcew5cp9twkjsv5y68ep4jl6";

    fn fixture(payload: &str) -> Vec<TatumBchTx> {
        serde_json::from_str(payload).unwrap()
    }

    #[test]
    fn coinbase_tx_reward_is_taken_as_whole_coins() {
        let txs = fixture(
            r#"[{
                "txid": "bch-cb-1",
                "blockhash": "bhash1",
                "blockheight": 1600000,
                "blocktime": 1700000300,
                "vin": [{"coinbase": "03a0861a"}],
                "vout": [
                    {"value": 0.05, "scriptPubKey": {"addresses": ["qqsomeoneelse"]}},
                    {"value": 3.125, "scriptPubKey": {"addresses": ["qq2mudwqwfcel7aah0jcew5cp9twkjsv5y68ep4jl6"]}}
                ]
            }]"#,
        );

        let blocks = extract_candidates(&txs, ADDRESS);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_hash, "bhash1");
        assert_eq!(blocks[0].reward, 3.125);
        assert_eq!(blocks[0].coinbase_txid, "bch-cb-1");
    }

    #[test]
    fn empty_or_missing_coinbase_field_is_filtered_out() {
        let txs = fixture(
            r#"[
                {
                    "txid": "bch-spend",
                    "blockhash": "bhash2",
                    "blockheight": 1,
                    "blocktime": 1,
                    "vin": [{"txid": "aa", "vout": 0}],
                    "vout": [{"value": 1.0, "scriptPubKey": {"addresses": ["qqx"]}}]
                },
                {
                    "txid": "bch-odd",
                    "blockhash": "bhash3",
                    "blockheight": 2,
                    "blocktime": 2,
                    "vin": [{"coinbase": ""}],
                    "vout": [{"value": 1.0, "scriptPubKey": {"addresses": ["qqx"]}}]
                }
            ]"#,
        );
        assert!(extract_candidates(&txs, ADDRESS).is_empty());
    }

    #[test]
    fn falls_back_to_first_output_when_address_not_found() {
        let txs = fixture(
            r#"[{
                "txid": "bch-cb-2",
                "blockhash": "bhash4",
                "blockheight": 3,
                "blocktime": 3,
                "vin": [{"coinbase": "ff"}],
                "vout": [
                    {"value": 6.25, "scriptPubKey": {"addresses": ["qqsomeoneelse"]}},
                    {"value": 0.01, "scriptPubKey": {}}
                ]
            }]"#,
        );
        assert_eq!(extract_candidates(&txs, ADDRESS)[0].reward, 6.25);
    }

    #[test]
    fn prefix_stripped_match_is_case_insensitive() {
        let txs = fixture(
            r#"[{
                "txid": "bch-cb-3",
                "blockhash": "bhash5",
                "blockheight": 4,
                "blocktime": 4,
                "vin": [{"coinbase": "ff"}],
                "vout": [
                    {"value": 0.5, "scriptPubKey": {"addresses": ["qqother"]}},
                    {"value": 12.5, "scriptPubKey": {"addresses": ["QQ2MUDWQWFCEL7AAH0JCEW5CP9TWKJSV5Y68EP4JL6"]}}
                ]
            }]"#,
        );
        assert_eq!(extract_candidates(&txs, ADDRESS)[0].reward, 12.5);
    }
}
