//! Wallet connection and action transaction submission.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::NetworkConfig;
use crate::error::ChainError;
use crate::provider::{ProviderEvent, WalletProvider, methods};
use crate::retry::{PollPolicy, poll_until};
use crate::types::{
    ConfirmationStatus, TransactionOutcome, TransactionReceipt, WalletState, parse_hex_quantity,
};

/// Receipt status value the chain reports for a successful transaction.
const RECEIPT_STATUS_SUCCESS: &str = "0x1";

/// Gas limit for a simple value transfer.
const SIMPLE_TRANSFER_GAS: &str = "0x5208";

/// Notices produced by draining provider events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletNotice {
    /// The active account switched to a new address.
    AccountChanged(String),

    /// The provider revoked all accounts; wallet state was torn down.
    Disconnected,

    /// The active chain changed; the caller should reload chain-derived
    /// context before doing anything else.
    ChainChanged(String),
}

/// Bridge between the game and an external wallet provider.
///
/// Owns the single [`WalletState`] value and the submit-and-confirm workflow
/// for action transactions. All waiting is a bounded sequential receipt poll;
/// a failed submission is never resent, callers re-invoke
/// [`submit_action`](Self::submit_action) to try again.
pub struct ChainTransactor {
    provider: Arc<dyn WalletProvider>,
    network: NetworkConfig,
    policy: PollPolicy,
    wallet: Option<WalletState>,
    events: Option<broadcast::Receiver<ProviderEvent>>,
}

impl ChainTransactor {
    pub fn new(provider: Arc<dyn WalletProvider>, network: NetworkConfig) -> Self {
        Self {
            provider,
            network,
            policy: PollPolicy::receipt_default(),
            wallet: None,
            events: None,
        }
    }

    /// Override the receipt polling policy.
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn wallet(&self) -> Option<&WalletState> {
        self.wallet.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.is_some()
    }

    /// Request account access and set up wallet state.
    ///
    /// Registers and switches to the target network on a best-effort basis:
    /// providers already on the chain reject both calls, so failures are
    /// logged and tolerated. The initial balance fetch is tolerated too.
    pub async fn connect(&mut self) -> Result<WalletState, ChainError> {
        let accounts = self
            .provider
            .request(methods::REQUEST_ACCOUNTS, Value::Null)
            .await
            .map_err(|e| ChainError::classify(&e))?;

        let accounts: Vec<String> = serde_json::from_value(accounts)
            .map_err(|e| ChainError::Unknown(format!("malformed account list: {e}")))?;
        let Some(address) = accounts.first().cloned() else {
            return Err(ChainError::NoAccounts);
        };

        if let Err(e) = self
            .provider
            .request(methods::ADD_CHAIN, json!([self.network.add_chain_params()]))
            .await
        {
            warn!(error = %e, "failed to register target network with provider");
        }
        if let Err(e) = self
            .provider
            .request(
                methods::SWITCH_CHAIN,
                json!([{ "chainId": self.network.chain_id_hex() }]),
            )
            .await
        {
            warn!(error = %e, "failed to switch provider to target network");
        }

        let balance_display = match self.query_balance(&address).await {
            Ok(display) => display,
            Err(e) => {
                warn!(error = %e, "failed to fetch initial balance");
                "unknown".to_string()
            }
        };

        self.events = Some(self.provider.subscribe());

        let wallet = WalletState {
            address,
            balance_display,
            connected: true,
        };
        info!(address = %wallet.address, network = %self.network.chain_name, "wallet connected");
        self.wallet = Some(wallet.clone());
        Ok(wallet)
    }

    /// Submit a game action as a minimal self-transfer and await its receipt.
    ///
    /// The per-action transfer value is the only on-chain payload; the game
    /// context is logged locally, since transfers to externally-owned
    /// accounts cannot carry calldata on the target chain. The transaction
    /// is broadcast at most once; the bounded poll is the only wait.
    pub async fn submit_action(&self, action_name: &str, context: Value) -> TransactionOutcome {
        let Some(wallet) = &self.wallet else {
            return TransactionOutcome::rejected(ChainError::NoWallet);
        };

        let value = action_value(action_name);
        let params = json!([{
            "from": wallet.address,
            "to": wallet.address,
            "value": format!("0x{value:x}"),
            "gas": SIMPLE_TRANSFER_GAS,
        }]);

        debug!(action = action_name, value, %context, "submitting action transaction");

        let hash = match self.provider.request(methods::SEND_TRANSACTION, params).await {
            Ok(v) => match v.as_str() {
                Some(h) => h.to_string(),
                None => {
                    return TransactionOutcome::rejected(ChainError::Unknown(
                        "provider returned a non-string transaction hash".to_string(),
                    ));
                }
            },
            Err(e) => {
                let kind = ChainError::classify(&e);
                warn!(action = action_name, error = %e, "transaction submission failed");
                return TransactionOutcome::rejected(kind);
            }
        };

        info!(action = action_name, hash = %hash, "transaction sent, awaiting receipt");

        let provider = Arc::clone(&self.provider);
        let receipt = poll_until(self.policy, || {
            let provider = Arc::clone(&provider);
            let hash = hash.clone();
            async move { fetch_receipt(provider.as_ref(), &hash).await }
        })
        .await;

        let Some(receipt) = receipt else {
            warn!(hash = %hash, "no receipt within the polling window");
            return TransactionOutcome::unconfirmed(hash, ChainError::Timeout);
        };

        let success = receipt.status.as_deref() == Some(RECEIPT_STATUS_SUCCESS);
        let block_number = receipt
            .block_number
            .as_deref()
            .and_then(parse_hex_quantity)
            .and_then(|n| u64::try_from(n).ok());
        let gas_used = receipt
            .gas_used
            .as_deref()
            .and_then(parse_hex_quantity)
            .map(|g| g.to_string());

        if success {
            info!(hash = %hash, block = ?block_number, "transaction confirmed");
            TransactionOutcome {
                hash: Some(hash),
                success: true,
                block_number,
                gas_used,
                error: None,
            }
        } else {
            warn!(hash = %hash, "transaction failed on chain");
            TransactionOutcome {
                hash: Some(hash),
                success: false,
                block_number,
                gas_used,
                error: Some(ChainError::OnChainFailure),
            }
        }
    }

    /// One-shot receipt probe for an already-submitted hash.
    pub async fn transaction_confirmed(&self, hash: &str) -> Result<ConfirmationStatus, ChainError> {
        let value = self
            .provider
            .request(methods::GET_TRANSACTION_RECEIPT, json!([hash]))
            .await
            .map_err(|e| ChainError::classify(&e))?;

        if value.is_null() {
            return Ok(ConfirmationStatus {
                confirmed: false,
                block_number: None,
            });
        }

        let receipt: TransactionReceipt = serde_json::from_value(value)
            .map_err(|e| ChainError::Unknown(format!("malformed receipt: {e}")))?;
        Ok(ConfirmationStatus {
            confirmed: true,
            block_number: receipt
                .block_number
                .as_deref()
                .and_then(parse_hex_quantity)
                .and_then(|n| u64::try_from(n).ok()),
        })
    }

    /// Re-query the connected account's balance and update wallet state.
    pub async fn refresh_balance(&mut self) -> Result<String, ChainError> {
        let address = match &self.wallet {
            Some(wallet) => wallet.address.clone(),
            None => return Err(ChainError::NoWallet),
        };

        let display = self.query_balance(&address).await?;
        if let Some(wallet) = &mut self.wallet {
            wallet.balance_display = display.clone();
        }
        Ok(display)
    }

    /// Clear wallet state. Idempotent.
    pub fn disconnect(&mut self) {
        if self.wallet.take().is_some() {
            info!("wallet disconnected");
        }
        self.events = None;
    }

    /// Apply queued provider events to wallet state and report what changed.
    ///
    /// Account changes update the address in place; an empty account list
    /// tears the wallet down. Chain changes are surfaced untouched so the
    /// caller can reload chain-derived context.
    pub fn drain_notices(&mut self) -> Vec<WalletNotice> {
        let mut notices = Vec::new();
        let Some(events) = &mut self.events else {
            return notices;
        };

        loop {
            match events.try_recv() {
                Ok(ProviderEvent::AccountsChanged(accounts)) => match accounts.first() {
                    Some(address) => {
                        if let Some(wallet) = &mut self.wallet {
                            wallet.address = address.clone();
                        }
                        notices.push(WalletNotice::AccountChanged(address.clone()));
                    }
                    None => {
                        self.wallet = None;
                        notices.push(WalletNotice::Disconnected);
                    }
                },
                Ok(ProviderEvent::ChainChanged(chain_id)) => {
                    notices.push(WalletNotice::ChainChanged(chain_id));
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "provider event queue lagged");
                }
                Err(_) => break,
            }
        }

        notices
    }

    async fn query_balance(&self, address: &str) -> Result<String, ChainError> {
        let result = self
            .provider
            .request(methods::GET_BALANCE, json!([address, "latest"]))
            .await
            .map_err(|e| ChainError::classify(&e))?;

        let wei = result
            .as_str()
            .and_then(parse_hex_quantity)
            .ok_or_else(|| ChainError::Unknown("malformed balance quantity".to_string()))?;
        Ok(self.network.format_balance(wei))
    }
}

/// One receipt probe. A null result and a probe error both mean "not yet".
async fn fetch_receipt(provider: &dyn WalletProvider, hash: &str) -> Option<TransactionReceipt> {
    match provider
        .request(methods::GET_TRANSACTION_RECEIPT, json!([hash]))
        .await
    {
        Ok(Value::Null) => None,
        Ok(value) => serde_json::from_value(value).ok(),
        Err(e) => {
            debug!(error = %e, "receipt query failed, still waiting");
            None
        }
    }
}

/// Per-action transfer value: a 32-bit string hash folded into 1..=1000.
///
/// Keeps transactions for distinct actions distinguishable without calldata.
fn action_value(name: &str) -> u64 {
    let mut h: i32 = 0;
    for c in name.chars() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32);
    }
    u64::from((h % 1000).unsigned_abs()) + 1
}
