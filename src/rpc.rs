use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::RavencoinConfig;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc error: {0}")]
    Node(String),
    #[error("rpc returned unexpected result")]
    BadResult,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
}

/// Minimal Basic-auth JSON-RPC 1.0 client for the Ravencoin node.
/// The node expects a text/plain body holding the JSON envelope.
pub struct RpcClient<'a> {
    http: &'a reqwest::Client,
    cfg: &'a RavencoinConfig,
}

impl<'a> RpcClient<'a> {
    pub fn new(http: &'a reqwest::Client, cfg: &'a RavencoinConfig) -> Self {
        Self { http, cfg }
    }

    pub async fn get_block_hash(&self, height: u64) -> Result<String, RpcError> {
        let result = self.call("getblockhash", json!([height])).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or(RpcError::BadResult)
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let body = json!({
            "jsonrpc": "1.0",
            "id": "block-tracker",
            "method": method,
            "params": params,
        });

        let res = self
            .http
            .post(&self.cfg.rpc_url)
            .basic_auth(&self.cfg.rpc_user, Some(&self.cfg.rpc_pass))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body.to_string())
            .send()
            .await?;

        let envelope: RpcEnvelope = res.json().await?;
        if let Some(err) = envelope.error {
            return Err(RpcError::Node(err.message));
        }
        envelope.result.ok_or(RpcError::BadResult)
    }
}
