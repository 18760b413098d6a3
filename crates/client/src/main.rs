//! Adventure game client binary.
//!
//! Composition root that assembles:
//! 1. Wallet provider (HTTP JSON-RPC) and `ChainTransactor`
//! 2. Session API (remote HTTP, or the simulated backend when none is
//!    configured) and `SessionReconciler`
//! 3. The interactive loop driving the submit-confirm-reconcile workflow
//!
//! All components are built here and injected; nothing downstream reaches
//! for globals.

mod app;
mod config;

use std::sync::Arc;

use anyhow::Result;

use chain_core::{ChainTransactor, NetworkConfig, WalletProvider};
use chain_rpc::{FaucetClient, HttpRpcProvider};
use session_core::{
    HttpSessionApi, SessionApi, SessionApiConfig, SessionReconciler, SimulatedSessionApi,
};

use app::App;
use config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let network = NetworkConfig::from_env();
    let client_config = ClientConfig::from_env();

    tracing::info!(chain = %network.chain_name, rpc = %network.rpc_url, "starting adventure client");

    let faucet = network.faucet_url.clone().map(FaucetClient::new);
    let provider: Arc<dyn WalletProvider> = Arc::new(HttpRpcProvider::from_network(&network));

    let api: Arc<dyn SessionApi> = match SessionApiConfig::from_env() {
        Some(session_config) => {
            tracing::info!(base_url = %session_config.base_url, "using remote session api");
            Arc::new(HttpSessionApi::new(session_config))
        }
        None => {
            tracing::info!("session api not configured, using simulated backend");
            Arc::new(SimulatedSessionApi::new(client_config.game_id.clone()))
        }
    };

    let transactor = ChainTransactor::new(provider, network);
    let reconciler = SessionReconciler::new(api);

    App::new(transactor, reconciler, faucet, client_config)
        .run()
        .await
}
