use actix_web::{HttpResponse, Responder, get, web};
use log::info;

use super::models::AppState;
use crate::poller;

/// Scheduler trigger: run one full poll cycle (four chain adapters plus the
/// price fetch, concurrently) and report the consolidated summary. Per-chain
/// failures show up inside `results`, not as an HTTP error.
#[get("/cron/poll-blocks/")]
pub async fn poll_blocks(state: web::Data<AppState>) -> impl Responder {
    info!("GET /cron/poll-blocks/ - cycle start");
    let summary = poller::run_poll_cycle(&state.http, &state.config, state.store.as_ref()).await;
    HttpResponse::Ok().json(summary)
}
