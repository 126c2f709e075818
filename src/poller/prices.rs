use log::{debug, error};
use serde::Deserialize;
use std::collections::HashMap;

use super::PollError;
use crate::chains::Chain;
use crate::config::PriceConfig;
use crate::store::BlockStore;

/* ---------- Raw provider payload (CoinGecko simple/price schema) ---------- */

#[derive(Debug, Deserialize)]
pub(crate) struct AssetPrice {
    pub usd: Option<f64>,
}

/* ---------- Price fetcher ---------- */

/// One batched request for all four assets. Chains missing from the response
/// (or quoted at zero) are skipped outright: their previously stored price
/// stays as-is. Any failure degrades to an empty map, never an error.
pub async fn fetch_and_store(
    http: &reqwest::Client,
    cfg: &PriceConfig,
    store: &dyn BlockStore,
) -> HashMap<Chain, f64> {
    match fetch_inner(http, cfg, store).await {
        Ok(prices) => prices,
        Err(e) => {
            error!("PRICES - fetch failed: {e}");
            HashMap::new()
        }
    }
}

async fn fetch_inner(
    http: &reqwest::Client,
    cfg: &PriceConfig,
    store: &dyn BlockStore,
) -> Result<HashMap<Chain, f64>, PollError> {
    let ids: Vec<&str> = Chain::ALL.iter().map(|c| c.market_asset_id()).collect();
    let url = format!(
        "{}/simple/price?ids={}&vs_currencies=usd",
        cfg.api_url,
        ids.join(",")
    );

    let res = http
        .get(&url)
        .header("x-cg-demo-api-key", &cfg.api_key)
        .send()
        .await?;
    if !res.status().is_success() {
        return Err(PollError::Status(res.status().as_u16()));
    }

    let data: HashMap<String, AssetPrice> = res.json().await?;
    store_prices(&data, store).await
}

pub(crate) async fn store_prices(
    data: &HashMap<String, AssetPrice>,
    store: &dyn BlockStore,
) -> Result<HashMap<Chain, f64>, PollError> {
    let mut prices = HashMap::new();
    for chain in Chain::ALL {
        let Some(usd) = data.get(chain.market_asset_id()).and_then(|p| p.usd) else {
            continue;
        };
        if usd == 0.0 {
            continue;
        }
        store.upsert_price(chain, usd).await?;
        debug!("PRICES - {} ({}) = ${usd}", chain.display_name(), chain.symbol());
        prices.insert(chain, usd);
    }
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn payload(json: &str) -> HashMap<String, AssetPrice> {
        serde_json::from_str(json).unwrap()
    }

    #[actix_web::test]
    async fn missing_asset_is_omitted_and_its_stored_price_survives() {
        let store = MemoryStore::new();
        store.upsert_price(Chain::DogecoinTestnet, 0.123).await.unwrap();

        let data = payload(
            r#"{
                "ravencoin": {"usd": 0.021},
                "bitcoin-cash": {"usd": 245.7},
                "litecoin": {"usd": 84.2}
            }"#,
        );
        let prices = store_prices(&data, &store).await.unwrap();

        assert_eq!(prices.len(), 3);
        assert!(!prices.contains_key(&Chain::DogecoinTestnet));
        assert_eq!(prices[&Chain::BcashTestnet], 245.7);

        // The stale dogecoin price is untouched, not zeroed.
        let stored = store.prices().await.unwrap();
        assert_eq!(stored[&Chain::DogecoinTestnet], 0.123);
        assert_eq!(stored[&Chain::RavencoinTestnet], 0.021);
    }

    #[actix_web::test]
    async fn zero_or_null_quotes_are_skipped() {
        let store = MemoryStore::new();
        let data = payload(
            r#"{
                "ravencoin": {"usd": 0.0},
                "bitcoin-cash": {},
                "dogecoin": {"usd": null},
                "litecoin": {"usd": 84.2}
            }"#,
        );
        let prices = store_prices(&data, &store).await.unwrap();

        assert_eq!(prices.len(), 1);
        assert_eq!(prices[&Chain::LitecoinTestnet], 84.2);
        assert_eq!(store.prices().await.unwrap().len(), 1);
    }
}
