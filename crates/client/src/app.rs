//! Interactive client loop.
//!
//! Line-oriented driver for the game workflow: every action command submits
//! a chain transaction, waits for confirmation, and only then reconciles the
//! action with the session backend.

use anyhow::Result;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use chain_core::{ChainTransactor, ConfirmedTx, WalletNotice};
use chain_rpc::FaucetClient;
use session_core::{ActionKind, Direction, GameAction, SessionReconciler};

use crate::config::ClientConfig;

const HELP: &str = "\
commands:
  connect           request wallet access and switch to the game network
  balance           refresh the wallet balance
  faucet            request testnet tokens for the connected wallet
  start             start a game session for the connected wallet
  move <direction>  move north/south/east/west (recorded on chain)
  collect|attack|defend   perform an action (recorded on chain)
  status            show wallet and session state
  resync            re-fetch the session from the backend
  top [n]           show the leaderboard (default 10)
  games             list joinable games
  quit              exit";

pub struct App {
    transactor: ChainTransactor,
    reconciler: SessionReconciler,
    faucet: Option<FaucetClient>,
    config: ClientConfig,
}

impl App {
    pub fn new(
        transactor: ChainTransactor,
        reconciler: SessionReconciler,
        faucet: Option<FaucetClient>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transactor,
            reconciler,
            faucet,
            config,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("Adventure client. Type 'help' for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut refresh = time::interval(self.config.leaderboard_refresh);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        refresh.tick().await; // the first tick completes immediately

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_command(line.trim()).await {
                        break;
                    }
                }
                _ = refresh.tick() => {
                    self.auto_refresh_leaderboard().await;
                }
            }
        }

        Ok(())
    }

    /// Dispatch one command line. Returns false to exit the loop.
    async fn handle_command(&mut self, line: &str) -> bool {
        self.report_wallet_notices();

        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (None, _) => {}
            (Some("help"), _) => println!("{HELP}"),
            (Some("connect"), _) => self.connect().await,
            (Some("balance"), _) => self.refresh_balance().await,
            (Some("faucet"), _) => self.request_faucet().await,
            (Some("start"), _) => self.start_session().await,
            (Some("move"), Some(direction)) => match direction.parse::<Direction>() {
                Ok(direction) => self.perform(GameAction::move_toward(direction)).await,
                Err(_) => println!("unknown direction '{direction}' (north/south/east/west)"),
            },
            (Some("move"), None) => println!("usage: move <north|south|east|west>"),
            (Some(kind @ ("collect" | "attack" | "defend")), _) => {
                match kind.parse::<ActionKind>() {
                    Ok(kind) => self.perform(GameAction::new(kind)).await,
                    Err(_) => println!("unknown action '{kind}'"),
                }
            }
            (Some("status"), _) => self.print_status(),
            (Some("resync"), _) => self.resync().await,
            (Some("top"), limit) => {
                let limit = limit.and_then(|n| n.parse().ok()).unwrap_or(10);
                self.print_leaderboard(limit).await;
            }
            (Some("games"), _) => self.print_games().await,
            (Some("quit" | "exit"), _) => return false,
            (Some(other), _) => println!("unknown command '{other}'; type 'help'"),
        }
        true
    }

    /// Submit one action as a chain transaction and reconcile on success.
    async fn perform(&mut self, action: GameAction) {
        let Some(session) = self.reconciler.session() else {
            println!("no active session; run 'start' first");
            return;
        };

        let label = action.chain_label();
        let context = json!({
            "sessionId": session.session_id,
            "position": session.position,
        });

        println!("Processing {label} on chain...");
        let outcome = self.transactor.submit_action(&label, context).await;

        match ConfirmedTx::try_from(&outcome) {
            Ok(confirmed) => {
                println!(
                    "Confirmed on chain: {}",
                    self.transactor.network().explorer_tx_url(confirmed.hash())
                );
                match self.reconciler.apply_action(action, &confirmed).await {
                    Ok(report) => println!(
                        "{} | score {} at ({}, {})",
                        report.message,
                        report.session.score,
                        report.session.position.x,
                        report.session.position.y
                    ),
                    Err(e) => println!("reconciliation failed: {e}"),
                }
            }
            Err(_) => {
                let reason = outcome
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown failure".to_string());
                match outcome.hash {
                    Some(hash) => println!(
                        "Transaction not confirmed ({reason}): {}",
                        self.transactor.network().explorer_tx_url(&hash)
                    ),
                    None => println!("Transaction failed: {reason}"),
                }
            }
        }
    }

    async fn connect(&mut self) {
        match self.transactor.connect().await {
            Ok(wallet) => println!(
                "Connected {} ({}) on {}",
                wallet.address,
                wallet.balance_display,
                self.transactor.network().chain_name
            ),
            Err(e) => println!("connect failed: {e}"),
        }
    }

    async fn refresh_balance(&mut self) {
        match self.transactor.refresh_balance().await {
            Ok(balance) => println!("Balance: {balance}"),
            Err(e) => println!("balance refresh failed: {e}"),
        }
    }

    async fn request_faucet(&mut self) {
        let Some(faucet) = &self.faucet else {
            println!("no faucet configured for this network");
            return;
        };
        let Some(wallet) = self.transactor.wallet() else {
            println!("connect a wallet first");
            return;
        };

        match faucet.request_tokens(&wallet.address).await {
            Ok(true) => {
                println!("Faucet request accepted; tokens should arrive shortly.");
                self.refresh_balance().await;
            }
            Ok(false) => println!("Faucet request declined; try again later."),
            Err(e) => println!("faucet request failed: {e}"),
        }
    }

    async fn start_session(&mut self) {
        let Some(wallet) = self.transactor.wallet() else {
            println!("connect a wallet first");
            return;
        };
        let address = wallet.address.clone();

        match self.reconciler.start_session(&address).await {
            Ok(session) => println!(
                "Session {} started; every action is recorded on chain.",
                session.session_id
            ),
            Err(e) => println!("failed to start session: {e}"),
        }
    }

    async fn resync(&mut self) {
        match self.reconciler.resync().await {
            Ok(session) => println!(
                "Session resynced: score {} at ({}, {})",
                session.score, session.position.x, session.position.y
            ),
            Err(e) => println!("resync failed: {e}"),
        }
    }

    fn print_status(&self) {
        match self.transactor.wallet() {
            Some(wallet) => println!("Wallet: {} ({})", wallet.address, wallet.balance_display),
            None => println!("Wallet: not connected"),
        }
        match self.reconciler.session() {
            Some(session) => println!(
                "Session {}: {} | score {} at ({}, {})",
                session.session_id,
                session.status,
                session.score,
                session.position.x,
                session.position.y
            ),
            None => println!("Session: none"),
        }
    }

    async fn print_leaderboard(&self, limit: usize) {
        match self.reconciler.fetch_leaderboard(limit).await {
            Ok(board) => {
                println!("Leaderboard ({} players total):", board.total_players);
                for entry in &board.entries {
                    println!(
                        "  {:>2}. {:<20} {:>6}  ({} games)",
                        entry.rank, entry.username, entry.score, entry.games_played
                    );
                }
            }
            Err(e) => println!("leaderboard unavailable: {e}"),
        }
    }

    async fn print_games(&self) {
        match self.reconciler.available_games().await {
            Ok(games) => {
                for game in games {
                    println!("  {} - {} ({} players)", game.id, game.description, game.players);
                }
            }
            Err(e) => println!("game list unavailable: {e}"),
        }
    }

    /// Passive refresh while a session is active.
    async fn auto_refresh_leaderboard(&self) {
        if self.reconciler.session().is_none() {
            return;
        }
        match self.reconciler.fetch_leaderboard(5).await {
            Ok(board) => {
                println!("── top players ──");
                for entry in &board.entries {
                    println!("  {:>2}. {:<20} {:>6}", entry.rank, entry.username, entry.score);
                }
            }
            Err(e) => debug!(error = %e, "leaderboard auto-refresh failed"),
        }
    }

    fn report_wallet_notices(&mut self) {
        for notice in self.transactor.drain_notices() {
            match notice {
                WalletNotice::AccountChanged(address) => {
                    println!("(wallet switched to {address})");
                }
                WalletNotice::Disconnected => {
                    println!("(wallet disconnected by provider)");
                }
                WalletNotice::ChainChanged(chain_id) => {
                    println!("(provider moved to chain {chain_id}; reconnect to continue)");
                }
            }
        }
    }
}
