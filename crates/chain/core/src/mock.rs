//! Mock wallet provider for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::error::ProviderError;
use crate::provider::{ProviderEvent, WalletProvider, methods};

/// In-memory wallet provider with scriptable behavior.
///
/// Simulates provider responses without network: accounts, balances, and a
/// receipt that becomes available after a configurable number of polls.
#[derive(Clone)]
pub struct MockWalletProvider {
    state: Arc<Mutex<MockState>>,
    events: broadcast::Sender<ProviderEvent>,
}

struct MockState {
    accounts: Vec<String>,
    /// Hex wei balance returned for every `eth_getBalance`.
    balance: String,
    connect_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    chain_setup_error: Option<ProviderError>,
    /// Number of receipt polls answered with null before the receipt lands.
    receipt_after: usize,
    receipt_status: String,
    receipt_polls: usize,
    tx_counter: u64,
    requests: Vec<String>,
}

impl MockWalletProvider {
    /// Provider with one unlocked account and a 2.5 native-token balance.
    pub fn new(address: &str) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Arc::new(Mutex::new(MockState {
                accounts: vec![address.to_string()],
                balance: "0x22b1c8c1227a0000".to_string(),
                connect_error: None,
                send_error: None,
                chain_setup_error: None,
                receipt_after: 0,
                receipt_status: "0x1".to_string(),
                receipt_polls: 0,
                tx_counter: 0,
                requests: Vec::new(),
            })),
            events,
        }
    }

    /// Provider that grants access but reports an empty account list.
    pub fn with_no_accounts() -> Self {
        let provider = Self::new("");
        provider.state.lock().unwrap().accounts.clear();
        provider
    }

    pub fn set_connect_error(&self, error: ProviderError) {
        self.state.lock().unwrap().connect_error = Some(error);
    }

    pub fn set_send_error(&self, error: ProviderError) {
        self.state.lock().unwrap().send_error = Some(error);
    }

    pub fn set_chain_setup_error(&self, error: ProviderError) {
        self.state.lock().unwrap().chain_setup_error = Some(error);
    }

    pub fn set_receipt_after(&self, polls: usize) {
        self.state.lock().unwrap().receipt_after = polls;
    }

    pub fn set_receipt_status(&self, status: &str) {
        self.state.lock().unwrap().receipt_status = status.to_string();
    }

    pub fn set_balance(&self, hex_wei: &str) {
        self.state.lock().unwrap().balance = hex_wei.to_string();
    }

    /// Push a provider event to all subscribers.
    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    /// Methods requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn receipt_polls(&self) -> usize {
        self.state.lock().unwrap().receipt_polls
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(method.to_string());

        match method {
            methods::REQUEST_ACCOUNTS => {
                if let Some(err) = state.connect_error.clone() {
                    return Err(err);
                }
                Ok(json!(state.accounts))
            }
            methods::GET_BALANCE => Ok(json!(state.balance)),
            methods::SEND_TRANSACTION => {
                if let Some(err) = state.send_error.clone() {
                    return Err(err);
                }
                state.tx_counter += 1;
                Ok(json!(format!("0x{:064x}", state.tx_counter)))
            }
            methods::GET_TRANSACTION_RECEIPT => {
                state.receipt_polls += 1;
                if state.receipt_polls <= state.receipt_after {
                    Ok(Value::Null)
                } else {
                    Ok(json!({
                        "status": state.receipt_status,
                        "blockNumber": "0x2a",
                        "gasUsed": "0x5208",
                    }))
                }
            }
            methods::ADD_CHAIN | methods::SWITCH_CHAIN => {
                if let Some(err) = state.chain_setup_error.clone() {
                    return Err(err);
                }
                Ok(Value::Null)
            }
            other => Err(ProviderError::message(format!(
                "unsupported method: {other}"
            ))),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
