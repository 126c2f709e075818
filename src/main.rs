mod api;
mod chains;
mod config;
mod model;
mod poller;
mod rpc;
mod store;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;

use api::AppState;
use config::Config;
use store::{BlockStore, MemoryStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let host = config.host.clone();
    let port = config.port;

    // Storage is constructed before the server binds; no route can observe
    // an uninitialized store.
    let store: Arc<dyn BlockStore> = Arc::new(MemoryStore::new());
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("reqwest client");

    println!("⛏️ Starting block tracker API at http://{host}:{port}");

    let state = web::Data::new(AppState { store, http, config });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
