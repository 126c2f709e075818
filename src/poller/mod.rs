pub mod bcash;
pub mod dogecoin;
mod error;
pub mod litecoin;
pub mod prices;
pub mod ravencoin;

use chrono::{SecondsFormat, Utc};
use futures::join;
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;

use crate::chains::Chain;
use crate::config::Config;
use crate::model::MinedBlock;
use crate::store::{BlockStore, StoreError};

pub use error::PollError;

/// Outcome of one adapter pass over one chain. A failed pass is still a
/// result — `error` set, counts zeroed — so one chain can never abort the
/// other three.
#[derive(Debug, Serialize)]
pub struct PollResult {
    pub chain: Chain,
    pub fetched: usize,
    #[serde(rename = "newBlocks")]
    pub new_blocks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PollResult {
    fn ok(chain: Chain, fetched: usize, new_blocks: usize) -> Self {
        Self { chain, fetched, new_blocks, error: None }
    }

    fn failed(chain: Chain, error: impl ToString) -> Self {
        Self { chain, fetched: 0, new_blocks: 0, error: Some(error.to_string()) }
    }
}

/// Consolidated report for one poll cycle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSummary {
    pub success: bool,
    pub timestamp: String,
    pub total_new_blocks: usize,
    pub results: Vec<PollResult>,
    pub prices: HashMap<Chain, f64>,
}

/// Run the four chain adapters and the price fetcher concurrently and wait
/// for all five; none of them can short-circuit the others.
pub async fn run_poll_cycle(
    http: &reqwest::Client,
    config: &Config,
    store: &dyn BlockStore,
) -> PollSummary {
    let (rvn, bch, doge, ltc, prices) = join!(
        ravencoin::poll(http, &config.ravencoin, store),
        bcash::poll(http, &config.bcash, store),
        dogecoin::poll(http, &config.dogecoin, store),
        litecoin::poll(http, &config.litecoin, store),
        prices::fetch_and_store(http, &config.prices, store),
    );

    let summary = summarize(vec![rvn, bch, doge, ltc], prices);
    for result in &summary.results {
        match &result.error {
            Some(error) => warn!("POLL {} - failed: {error}", result.chain),
            None => info!(
                "POLL {} - fetched {} reward txs, {} new",
                result.chain, result.fetched, result.new_blocks
            ),
        }
    }
    info!("POLL - cycle complete, {} new blocks", summary.total_new_blocks);
    summary
}

fn summarize(results: Vec<PollResult>, prices: HashMap<Chain, f64>) -> PollSummary {
    PollSummary {
        success: true,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        total_new_blocks: results.iter().map(|r| r.new_blocks).sum(),
        results,
        prices,
    }
}

/// Shared adapter tail: fetch candidates, then dedup-check and insert each
/// one sequentially (the check must land before the insert attempt).
pub(crate) async fn poll_chain<F>(chain: Chain, store: &dyn BlockStore, fetch: F) -> PollResult
where
    F: Future<Output = Result<Vec<MinedBlock>, PollError>>,
{
    let candidates = match fetch.await {
        Ok(candidates) => candidates,
        Err(e) => return PollResult::failed(chain, e),
    };
    let fetched = candidates.len();
    match store_new_blocks(store, candidates).await {
        Ok(new_blocks) => PollResult::ok(chain, fetched, new_blocks),
        Err(e) => PollResult { chain, fetched, new_blocks: 0, error: Some(e.to_string()) },
    }
}

async fn store_new_blocks(
    store: &dyn BlockStore,
    candidates: Vec<MinedBlock>,
) -> Result<usize, StoreError> {
    let mut inserted = 0;
    for block in candidates {
        if store.block_exists(&block.block_hash).await? {
            continue;
        }
        if store.insert_block(block).await {
            inserted += 1;
        }
    }
    Ok(inserted)
}
