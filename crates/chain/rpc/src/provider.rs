//! JSON-RPC wallet provider over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tracing::debug;

use chain_core::error::codes;
use chain_core::{NetworkConfig, ProviderError, ProviderEvent, WalletProvider, methods};

/// Wallet provider backed by a chain node's HTTP JSON-RPC endpoint.
///
/// Signing happens node-side: the node must hold unlocked accounts (a dev
/// node, or one fronted by a signer). Wallet-only methods are translated to
/// their node equivalents where one exists; the rest are forwarded as-is and
/// the node's rejection propagates as a structured error.
pub struct HttpRpcProvider {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
    events: broadcast::Sender<ProviderEvent>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl HttpRpcProvider {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            url: rpc_url.into(),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
            events,
        }
    }

    pub fn from_network(network: &NetworkConfig) -> Self {
        Self::new(network.rpc_url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Translate wallet-only methods to their node-side equivalents.
///
/// `eth_requestAccounts` is an interactive wallet method; against a node the
/// granted account list is simply `eth_accounts`.
fn rewrite_method(method: &str) -> &str {
    match method {
        methods::REQUEST_ACCOUNTS => "eth_accounts",
        other => other,
    }
}

/// JSON-RPC 2.0 request body.
fn rpc_body(id: u64, method: &str, params: Value) -> Value {
    let params = match params {
        Value::Null => json!([]),
        other => other,
    };
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

#[async_trait]
impl WalletProvider for HttpRpcProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let method = rewrite_method(method);
        let body = rpc_body(id, method, params);

        debug!(%method, id, "rpc request");

        // A dead endpoint is the headless analogue of a missing provider,
        // so transport failures carry the disconnected code.
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::new(codes::DISCONNECTED, format!("transport error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::message(format!(
                "rpc endpoint returned status {status}: {text}"
            )));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::message(format!("malformed rpc response: {e}")))?;

        if let Some(err) = parsed.error {
            debug!(%method, code = err.code, "rpc error response");
            return Err(ProviderError::new(err.code, err.message));
        }
        Ok(parsed.result)
    }

    /// HTTP transports have no push channel; the receiver never yields.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_only_methods_are_rewritten() {
        assert_eq!(rewrite_method(methods::REQUEST_ACCOUNTS), "eth_accounts");
        assert_eq!(rewrite_method(methods::SEND_TRANSACTION), methods::SEND_TRANSACTION);
        assert_eq!(rewrite_method(methods::ADD_CHAIN), methods::ADD_CHAIN);
    }

    #[test]
    fn null_params_become_an_empty_positional_list() {
        let body = rpc_body(7, "eth_accounts", Value::Null);
        assert_eq!(body["params"], json!([]));
        assert_eq!(body["id"], 7);
        assert_eq!(body["jsonrpc"], "2.0");
    }

    #[test]
    fn error_responses_deserialize_with_code_and_message() {
        let parsed: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"insufficient funds"}}"#,
        )
        .unwrap();
        let err = parsed.error.unwrap();
        assert_eq!(err.code, -32000);
        assert_eq!(err.message, "insufficient funds");
    }

    #[test]
    fn null_results_deserialize_as_null() {
        let parsed: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(parsed.error.is_none());
        assert!(parsed.result.is_null());
    }
}
