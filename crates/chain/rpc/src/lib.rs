//! HTTP JSON-RPC implementation of the wallet provider seam.
//!
//! This crate is the headless counterpart of a browser wallet: it forwards
//! provider requests to a chain node over HTTP JSON-RPC, relying on the
//! node to hold unlocked accounts for signing. It also carries the faucet
//! client, the only other chain-side HTTP surface.

pub mod faucet;
pub mod provider;

pub use faucet::FaucetClient;
pub use provider::HttpRpcProvider;
