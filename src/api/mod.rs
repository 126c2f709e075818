mod blocks;
mod health;
pub mod models;
mod poll;
mod transactions;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(blocks::get_blocks)
            .service(poll::poll_blocks)
            .service(transactions::get_transactions),
    );
}
