//! Testnet faucet client.

use serde_json::json;
use tracing::{info, warn};

use chain_core::ChainError;

/// Client for a testnet token faucet endpoint.
pub struct FaucetClient {
    url: String,
    http: reqwest::Client,
}

impl FaucetClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Request testnet tokens for an address.
    ///
    /// Returns whether the faucet accepted the request; rate-limited or
    /// otherwise declined requests report `false` rather than an error so
    /// the caller can simply suggest trying again later.
    pub async fn request_tokens(&self, address: &str) -> Result<bool, ChainError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "address": address }))
            .send()
            .await
            .map_err(|e| ChainError::Unknown(format!("faucet request failed: {e}")))?;

        if response.status().is_success() {
            info!(address, "faucet request accepted");
            Ok(true)
        } else {
            warn!(address, status = %response.status(), "faucet request declined");
            Ok(false)
        }
    }
}
