use actix_web::{HttpResponse, Responder, get, web};
use futures::join;
use log::error;
use serde::Deserialize;

use super::models::{AppState, BlocksResponse};
use crate::chains::Chain;

#[derive(Deserialize)]
pub struct BlocksQuery {
    chain: Option<String>,
}

/// Read endpoint for the presentation layer: persisted blocks (optionally
/// filtered by chain) plus current prices, fetched from the store in
/// parallel. Fails closed - on any read error the payload is empty and
/// well-formed, never partial.
#[get("/blocks/")]
pub async fn get_blocks(
    state: web::Data<AppState>,
    query: web::Query<BlocksQuery>,
) -> impl Responder {
    let filter = match query.chain.as_deref() {
        // An unknown filter value matches nothing rather than erroring.
        Some(id) => match Chain::from_id(id) {
            Some(chain) => Some(chain),
            None => return HttpResponse::Ok().json(BlocksResponse::empty()),
        },
        None => None,
    };

    let (blocks, prices) = join!(state.store.blocks(filter), state.store.prices());
    match (blocks, prices) {
        (Ok(blocks), Ok(prices)) => HttpResponse::Ok().json(BlocksResponse {
            count: blocks.len(),
            blocks,
            prices,
            error: None,
        }),
        (Err(e), _) | (_, Err(e)) => {
            error!("GET /blocks/ - store read failed: {e}");
            HttpResponse::InternalServerError().json(BlocksResponse::failed("Failed to fetch blocks"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use std::sync::Arc;

    use crate::config::Config;
    use crate::model::MinedBlock;
    use crate::store::{BlockStore, MemoryStore};

    fn block(hash: &str, time: i64, chain: Chain) -> MinedBlock {
        MinedBlock {
            block_hash: hash.into(),
            block_height: 10,
            block_time: time,
            reward: 2.0,
            coinbase_txid: format!("txid-{hash}"),
            chain,
        }
    }

    async fn seeded_state() -> web::Data<AppState> {
        let store = MemoryStore::new();
        store.insert_block(block("a", 100, Chain::LitecoinTestnet)).await;
        store.insert_block(block("b", 200, Chain::DogecoinTestnet)).await;
        store.upsert_price(Chain::LitecoinTestnet, 84.2).await.unwrap();
        web::Data::new(AppState {
            store: Arc::new(store),
            http: reqwest::Client::new(),
            config: Config::from_env(),
        })
    }

    #[actix_web::test]
    async fn lists_all_blocks_newest_first_with_prices() {
        let app =
            test::init_service(App::new().app_data(seeded_state().await).service(get_blocks))
                .await;
        let req = test::TestRequest::get().uri("/blocks/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 2);
        assert_eq!(body["blocks"][0]["blockHash"], "b");
        assert_eq!(body["blocks"][1]["blockHash"], "a");
        assert_eq!(body["prices"]["litecoin-testnet"], 84.2);
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn chain_filter_narrows_the_result() {
        let app =
            test::init_service(App::new().app_data(seeded_state().await).service(get_blocks))
                .await;
        let req = test::TestRequest::get()
            .uri("/blocks/?chain=litecoin-testnet")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 1);
        assert_eq!(body["blocks"][0]["chain"], "litecoin-testnet");
    }

    #[actix_web::test]
    async fn unknown_chain_filter_yields_empty_not_error() {
        let app =
            test::init_service(App::new().app_data(seeded_state().await).service(get_blocks))
                .await;
        let req = test::TestRequest::get().uri("/blocks/?chain=bitcoin-mainnet").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["count"], 0);
        assert_eq!(body["blocks"].as_array().unwrap().len(), 0);
    }
}
