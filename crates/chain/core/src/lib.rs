//! Chain integration layer for the adventure client.
//!
//! This crate owns the wallet side of the game workflow: connecting to a
//! wallet provider, submitting game actions as minimal transactions, and
//! waiting for their confirmation.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: ChainTransactor (wallet state, action transactions, polling)
//!
//! Layer 0: WalletProvider (pure transport, injected)
//! ```
//!
//! # Design Philosophy
//!
//! - **Layer 0 (Provider)**: one request/subscribe seam; no game knowledge.
//!   Implementations live elsewhere (HTTP JSON-RPC, test doubles).
//! - **Layer 1 (Transactor)**: wallet lifecycle and the submit-and-confirm
//!   workflow, with a bounded receipt poll as the only wait primitive.
//!
//! There is no process-wide state: the provider is constructed at the
//! composition root and injected. Every fallible operation returns a typed
//! result, and provider error wording never crosses this crate's boundary
//! (see [`ChainError::classify`]).

pub mod config;
pub mod error;
pub mod provider;
pub mod retry;
pub mod transactor;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use config::NetworkConfig;
pub use error::{ChainError, ProviderError};
pub use provider::{ProviderEvent, WalletProvider, methods};
pub use retry::{PollPolicy, poll_until};
pub use transactor::{ChainTransactor, WalletNotice};
pub use types::{
    ConfirmationStatus, ConfirmedTx, NotConfirmed, TransactionOutcome, TransactionReceipt,
    WalletState,
};

#[cfg(test)]
pub use mock::MockWalletProvider;
