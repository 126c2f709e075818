use actix_web::{HttpResponse, Responder, get, web};
use log::warn;

use super::models::{AppState, ErrorResponse, TransactionsResponse};
use crate::chains::Chain;
use crate::poller;

/// Live view of one chain's current reward transactions, straight from the
/// provider - nothing is written to the store.
#[get("/transactions/{chain}/")]
pub async fn get_transactions(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> impl Responder {
    let id = path.into_inner().0;
    let Some(chain) = Chain::from_id(&id) else {
        return HttpResponse::NotFound().json(ErrorResponse { error: format!("unknown chain: {id}") });
    };

    let result = match chain {
        Chain::RavencoinTestnet => {
            poller::ravencoin::fetch_candidates(&state.http, &state.config.ravencoin).await
        }
        Chain::BcashTestnet => {
            poller::bcash::fetch_candidates(&state.http, &state.config.bcash).await
        }
        Chain::DogecoinTestnet => {
            poller::dogecoin::fetch_candidates(&state.http, &state.config.dogecoin).await
        }
        Chain::LitecoinTestnet => {
            poller::litecoin::fetch_candidates(&state.http, &state.config.litecoin).await
        }
    };

    match result {
        Ok(blocks) => HttpResponse::Ok().json(TransactionsResponse {
            chain,
            address: state.config.address_for(chain).to_string(),
            blocks,
        }),
        Err(e) => {
            warn!("GET /transactions/{chain}/ - provider failed: {e}");
            HttpResponse::ServiceUnavailable().json(ErrorResponse { error: e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use std::sync::Arc;

    use crate::config::Config;
    use crate::store::MemoryStore;

    #[actix_web::test]
    async fn unknown_chain_is_a_404() {
        let state = web::Data::new(AppState {
            store: Arc::new(MemoryStore::new()),
            http: reqwest::Client::new(),
            config: Config::from_env(),
        });
        let app = test::init_service(App::new().app_data(state).service(get_transactions)).await;

        let req = test::TestRequest::get().uri("/transactions/monero-testnet/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
    }
}
