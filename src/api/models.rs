use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::chains::Chain;
use crate::config::Config;
use crate::model::MinedBlock;
use crate::store::BlockStore;

/// Shared application state: the persistence facade, one HTTP client reused
/// for every provider call, and the resolved configuration.
pub struct AppState {
    pub store: Arc<dyn BlockStore>,
    pub http: reqwest::Client,
    pub config: Config,
}

/* ---------- Blocks API Models ---------- */

#[derive(Serialize)]
pub struct BlocksResponse {
    pub blocks: Vec<MinedBlock>,
    pub count: usize,
    pub prices: HashMap<Chain, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BlocksResponse {
    pub fn empty() -> Self {
        Self { blocks: Vec::new(), count: 0, prices: HashMap::new(), error: None }
    }

    pub fn failed(error: &str) -> Self {
        Self { error: Some(error.to_string()), ..Self::empty() }
    }
}

/* ---------- Transactions API Models ---------- */

#[derive(Serialize)]
pub struct TransactionsResponse {
    pub chain: Chain,
    pub address: String,
    pub blocks: Vec<MinedBlock>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
