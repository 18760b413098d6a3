//! Error taxonomy for wallet and chain operations.

use thiserror::Error;

/// Well-known provider error codes (EIP-1193 and common JSON-RPC values).
pub mod codes {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The provider is disconnected from all chains.
    pub const DISCONNECTED: i64 = 4900;
    /// The provider is not connected to the requested chain.
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    /// Generic server error; nodes overload this for many failures.
    pub const SERVER_ERROR: i64 = -32000;
    /// The method does not exist on this provider.
    pub const METHOD_NOT_FOUND: i64 = -32601;
}

/// Structured error surfaced by a wallet provider.
///
/// Providers that speak EIP-1193 or JSON-RPC attach a numeric code; the
/// message is kept for providers that only report text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider error: {message}")]
pub struct ProviderError {
    /// Numeric code when the provider supplies one.
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Error carrying only text, from providers without structured codes.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// Errors surfaced to callers of wallet and chain operations.
///
/// Callers must branch on the kind, never on message wording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("no wallet provider is available")]
    ProviderUnavailable,

    #[error("provider returned no accounts")]
    NoAccounts,

    #[error("transaction rejected by user")]
    UserRejected,

    #[error("insufficient funds for transaction")]
    InsufficientFunds,

    #[error("gas estimation failed")]
    GasEstimationFailed,

    #[error("transaction failed on chain")]
    OnChainFailure,

    #[error("timed out waiting for transaction confirmation")]
    Timeout,

    #[error("no wallet connected")]
    NoWallet,

    #[error("chain error: {0}")]
    Unknown(String),
}

impl ChainError {
    /// Classify a provider error into a caller-facing kind.
    ///
    /// Structured codes are authoritative when present; everything else goes
    /// through the message fallback.
    pub fn classify(err: &ProviderError) -> Self {
        match err.code {
            Some(codes::USER_REJECTED) => return Self::UserRejected,
            Some(codes::DISCONNECTED) | Some(codes::CHAIN_DISCONNECTED) => {
                return Self::ProviderUnavailable;
            }
            _ => {}
        }
        Self::classify_message(&err.message)
    }

    /// Fallback adapter for providers that attach no usable code.
    ///
    /// Substring matching of provider wording is confined to this function.
    fn classify_message(message: &str) -> Self {
        let msg = message.to_ascii_lowercase();
        if msg.contains("user denied") || msg.contains("rejected") {
            Self::UserRejected
        } else if msg.contains("insufficient funds") {
            Self::InsufficientFunds
        } else if msg.contains("gas") {
            Self::GasEstimationFailed
        } else {
            Self::Unknown(message.to_string())
        }
    }
}
