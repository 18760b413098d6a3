//! Common types for wallet and transaction state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ChainError;

/// Snapshot of the connected wallet.
///
/// Owned exclusively by the transactor: created on connect, updated on
/// account changes and balance refreshes, destroyed on disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    /// Hex account address.
    pub address: String,

    /// Human-readable balance, e.g. `"2.5000 MON"`.
    pub balance_display: String,

    pub connected: bool,
}

/// Outcome of one transaction submission attempt.
///
/// Immutable once produced. `hash` is absent when the transaction never
/// reached the chain (pre-broadcast rejection); `error` carries the typed
/// kind for every non-success.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
    pub hash: Option<String>,
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: Option<String>,
    pub error: Option<ChainError>,
}

impl TransactionOutcome {
    /// Submission failed before anything was broadcast.
    pub fn rejected(error: ChainError) -> Self {
        Self {
            hash: None,
            success: false,
            block_number: None,
            gas_used: None,
            error: Some(error),
        }
    }

    /// Broadcast happened but the transaction did not confirm successfully.
    pub fn unconfirmed(hash: String, error: ChainError) -> Self {
        Self {
            hash: Some(hash),
            success: false,
            block_number: None,
            gas_used: None,
            error: Some(error),
        }
    }
}

/// Receipt fields consumed from `eth_getTransactionReceipt`.
///
/// All quantities arrive as 0x-prefixed hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub status: Option<String>,
    pub block_number: Option<String>,
    pub gas_used: Option<String>,
}

/// Result of a one-shot receipt probe for an already-submitted hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationStatus {
    pub confirmed: bool,
    pub block_number: Option<u64>,
}

/// Reference to a transaction that confirmed successfully.
///
/// The only way to obtain one is from a [`TransactionOutcome`] with
/// `success == true`, which is what lets downstream consumers demand proof
/// of confirmation instead of trusting the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTx {
    hash: String,
    block_number: Option<u64>,
}

impl ConfirmedTx {
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn block_number(&self) -> Option<u64> {
        self.block_number
    }
}

/// Rejection when building a [`ConfirmedTx`] from a non-successful outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transaction outcome is not a confirmed success")]
pub struct NotConfirmed;

impl TryFrom<&TransactionOutcome> for ConfirmedTx {
    type Error = NotConfirmed;

    fn try_from(outcome: &TransactionOutcome) -> Result<Self, Self::Error> {
        match (&outcome.hash, outcome.success) {
            (Some(hash), true) => Ok(Self {
                hash: hash.clone(),
                block_number: outcome.block_number,
            }),
            _ => Err(NotConfirmed),
        }
    }
}

/// Parse a 0x-prefixed hex quantity.
pub fn parse_hex_quantity(value: &str) -> Option<u128> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    u128::from_str_radix(digits, 16).ok()
}
