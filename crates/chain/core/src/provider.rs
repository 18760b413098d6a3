//! Wallet provider abstraction.
//!
//! The provider is the injected seam between the transactor and whatever
//! signs and broadcasts transactions: a browser wallet bridge, a node with
//! unlocked accounts, or a test double.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::ProviderError;

/// Provider request methods used by this crate.
pub mod methods {
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const GET_BALANCE: &str = "eth_getBalance";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
    pub const ADD_CHAIN: &str = "wallet_addEthereumChain";
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
}

/// Push notifications emitted by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The account list changed. An empty list means the wallet was locked
    /// or access was revoked.
    AccountsChanged(Vec<String>),

    /// The active chain changed; carries the new hex chain id.
    ChainChanged(String),
}

/// Transport seam to a wallet provider.
///
/// Mirrors the standard provider surface: a single request entry point plus
/// event subscription. Implementations must be safe to share across tasks.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Perform one request against the provider.
    ///
    /// `params` is positional (a JSON array) for methods that take
    /// parameters, `Value::Null` otherwise.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Subscribe to provider push notifications.
    ///
    /// Transports that cannot push (plain HTTP) return a receiver that never
    /// yields.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
