//! Target network parameters.

use std::env;

use serde_json::{Value, json};

/// Connection parameters for the target chain.
///
/// Defaults describe the public testnet the game is deployed against;
/// every field can be overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,

    /// Explorer base; transaction links are `{explorer}/tx/{hash}`.
    pub explorer_url: String,

    pub currency_symbol: String,

    /// Display decimals for the native currency. Fixed at 18 on every
    /// supported network, kept as data so balance math stays in one place.
    pub currency_decimals: u8,

    pub faucet_url: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: 10143,
            chain_name: "Monad Testnet".to_string(),
            rpc_url: "https://testnet-rpc.monad.xyz".to_string(),
            explorer_url: "https://testnet.monadexplorer.com".to_string(),
            currency_symbol: "MON".to_string(),
            currency_decimals: 18,
            faucet_url: Some("https://faucet.monad.xyz/api/request".to_string()),
        }
    }
}

impl NetworkConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CHAIN_ID` - Numeric chain id (default: 10143)
    /// - `CHAIN_NAME` - Human-readable chain name
    /// - `CHAIN_RPC_URL` - RPC endpoint URL
    /// - `CHAIN_EXPLORER_URL` - Explorer base URL
    /// - `CHAIN_CURRENCY_SYMBOL` - Native currency symbol
    /// - `CHAIN_FAUCET_URL` - Faucet endpoint (optional; empty disables)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(chain_id) = read_env::<u64>("CHAIN_ID") {
            config.chain_id = chain_id;
        }
        if let Ok(name) = env::var("CHAIN_NAME") {
            config.chain_name = name;
        }
        if let Ok(url) = env::var("CHAIN_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(url) = env::var("CHAIN_EXPLORER_URL") {
            config.explorer_url = url;
        }
        if let Ok(symbol) = env::var("CHAIN_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }
        if let Ok(url) = env::var("CHAIN_FAUCET_URL") {
            config.faucet_url = (!url.is_empty()).then_some(url);
        }

        config
    }

    /// EIP-155 hex chain id, e.g. `"0x279f"`.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Explorer link for a transaction hash.
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), hash)
    }

    /// `wallet_addEthereumChain` parameter object for this network.
    pub fn add_chain_params(&self) -> Value {
        json!({
            "chainId": self.chain_id_hex(),
            "chainName": self.chain_name,
            "nativeCurrency": {
                "name": self.chain_name,
                "symbol": self.currency_symbol,
                "decimals": self.currency_decimals,
            },
            "rpcUrls": [self.rpc_url],
            "blockExplorerUrls": [self.explorer_url],
        })
    }

    /// Format a wei amount for display, e.g. `"2.5000 MON"`.
    pub fn format_balance(&self, wei: u128) -> String {
        let scale = 10f64.powi(i32::from(self.currency_decimals));
        format!("{:.4} {}", wei as f64 / scale, self.currency_symbol)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
