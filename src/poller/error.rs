use thiserror::Error;

use crate::rpc::RpcError;
use crate::store::StoreError;

/// Anything that can go wrong inside one adapter pass. These never cross the
/// orchestrator boundary as `Err`; each adapter folds them into the `error`
/// field of its `PollResult`.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Provider answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// Provider answered, but not with the JSON we asked for.
    #[error("API unavailable")]
    Unavailable,
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
