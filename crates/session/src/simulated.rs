//! Simulated session backend.
//!
//! In-process implementation of [`SessionApi`] with seeded randomness and
//! optional request latency. This is the offline backend for the demo
//! client, not a test fixture: it behaves like the remote service as seen
//! from the reconciler, including its randomized score deltas.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::time;

use crate::api::{ActionResponse, SessionApi};
use crate::error::ApiError;
use crate::types::{
    ActionKind, GameAction, GameInfo, GameSession, LeaderboardData, LeaderboardEntry, Position,
    SessionStatus, unix_millis,
};

const PLAYER_NAMES: [&str; 15] = [
    "CryptoKnight",
    "BlockchainBeast",
    "MonadMaster",
    "DeFiDragon",
    "Web3Warrior",
    "TokenTitan",
    "ChainChampion",
    "EthereumElite",
    "SoliditySlayer",
    "GasGuru",
    "SmartContractSage",
    "DecentralizedDuke",
    "ConsensusKing",
    "ValidatorVanguard",
    "NodeNinja",
];

/// Simulated remote session service.
pub struct SimulatedSessionApi {
    game_id: String,
    realistic_latency: bool,
    rng: Mutex<StdRng>,
    sessions: Mutex<HashMap<String, GameSession>>,
}

impl SimulatedSessionApi {
    /// Simulator with service-like latency per call.
    pub fn new(game_id: impl Into<String>) -> Self {
        Self::build(game_id, StdRng::from_entropy(), true)
    }

    /// Simulator without artificial latency.
    pub fn instant(game_id: impl Into<String>) -> Self {
        Self::build(game_id, StdRng::from_entropy(), false)
    }

    /// Deterministic simulator for reproducible runs.
    pub fn seeded(game_id: impl Into<String>, seed: u64) -> Self {
        Self::build(game_id, StdRng::seed_from_u64(seed), false)
    }

    fn build(game_id: impl Into<String>, rng: StdRng, realistic_latency: bool) -> Self {
        Self {
            game_id: game_id.into(),
            realistic_latency,
            rng: Mutex::new(rng),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    async fn delay(&self, millis: u64) {
        if self.realistic_latency {
            time::sleep(Duration::from_millis(millis)).await;
        }
    }

    fn random_wallet(rng: &mut StdRng) -> String {
        format!("0x{:032x}{:08x}", rng.r#gen::<u128>(), rng.r#gen::<u32>())
    }
}

#[async_trait]
impl SessionApi for SimulatedSessionApi {
    async fn create_session(&self, user_wallet: &str) -> Result<GameSession, ApiError> {
        self.delay(800).await;

        let suffix: String = {
            let mut rng = self.rng.lock().await;
            (0..9)
                .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
                .collect::<String>()
                .to_ascii_lowercase()
        };

        let session = GameSession {
            session_id: format!("session_{}_{}", unix_millis(), suffix),
            game_id: self.game_id.clone(),
            user_wallet: user_wallet.to_string(),
            status: SessionStatus::Active,
            score: 0,
            position: Position::ORIGIN,
            created_at: unix_millis(),
        };

        self.sessions
            .lock()
            .await
            .insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    async fn session_status(&self, session_id: &str) -> Result<GameSession, ApiError> {
        self.delay(300).await;

        if let Some(session) = self.sessions.lock().await.get(session_id) {
            return Ok(session.clone());
        }

        // Unknown ids still resolve, as the service fabricates a plausible
        // record for sessions created elsewhere.
        let mut rng = self.rng.lock().await;
        Ok(GameSession {
            session_id: session_id.to_string(),
            game_id: self.game_id.clone(),
            user_wallet: Self::random_wallet(&mut rng),
            status: SessionStatus::Active,
            score: rng.gen_range(0..1000),
            position: Position {
                x: rng.gen_range(0..10),
                y: rng.gen_range(0..10),
            },
            created_at: unix_millis().saturating_sub(rng.gen_range(0..3_600_000)),
        })
    }

    async fn submit_action(
        &self,
        session_id: &str,
        action: &GameAction,
    ) -> Result<ActionResponse, ApiError> {
        self.delay(500).await;

        let (success, delta) = {
            let mut rng = self.rng.lock().await;
            let success = rng.gen_bool(0.9);
            let delta = if success { rng.gen_range(10..60) } else { 0 };
            (success, delta)
        };

        let message = match (action.kind, action.direction) {
            (ActionKind::Move, Some(direction)) if success => {
                format!("Moved {direction}! Found treasure worth {delta} points!")
            }
            (ActionKind::Move, _) => "Move blocked by obstacle!".to_string(),
            (kind, _) if success => {
                format!("Action {kind} successful! Gained {delta} points!")
            }
            (kind, _) => format!("Action {kind} failed!"),
        };

        // Keep the server-side record coherent with what the reconciler
        // derives, so a later resync agrees with local state.
        if let Some(session) = self.sessions.lock().await.get_mut(session_id) {
            session.score += delta;
            if action.kind == ActionKind::Move
                && let Some(direction) = action.direction
            {
                session.position.step(direction);
            }
        }

        Ok(ActionResponse {
            success,
            new_score: delta,
            message,
        })
    }

    async fn leaderboard(&self, limit: usize) -> Result<LeaderboardData, ApiError> {
        self.delay(600).await;

        let mut rng = self.rng.lock().await;
        let mut entries: Vec<LeaderboardEntry> = (0..limit.min(PLAYER_NAMES.len()))
            .map(|i| LeaderboardEntry {
                rank: 0,
                username: PLAYER_NAMES
                    .get(i)
                    .map(|name| (*name).to_string())
                    .unwrap_or_else(|| format!("Player{}", i + 1)),
                wallet: Self::random_wallet(&mut rng),
                score: rng.gen_range(0..5000) + ((PLAYER_NAMES.len() - i) as i64) * 100,
                games_played: rng.gen_range(1..51),
            })
            .collect();

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index as u32 + 1;
        }

        Ok(LeaderboardData {
            game_id: self.game_id.clone(),
            entries,
            total_players: rng.gen_range(500..1500),
            last_updated: unix_millis(),
        })
    }

    async fn available_games(&self) -> Result<Vec<GameInfo>, ApiError> {
        self.delay(400).await;

        let mut rng = self.rng.lock().await;
        Ok(vec![
            GameInfo {
                id: self.game_id.clone(),
                name: "Adventure".to_string(),
                description: "Explore the chain realm and collect treasures".to_string(),
                players: rng.gen_range(100..600),
            },
            GameInfo {
                id: "battle-arena".to_string(),
                name: "Battle Arena".to_string(),
                description: "PvP combat on the blockchain".to_string(),
                players: rng.gen_range(50..350),
            },
            GameInfo {
                id: "treasure-hunt".to_string(),
                name: "Treasure Hunt".to_string(),
                description: "Find hidden treasures across the network".to_string(),
                players: rng.gen_range(25..225),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::Direction;

    #[tokio::test]
    async fn leaderboard_is_sorted_with_dense_ranks() {
        let api = SimulatedSessionApi::seeded("adventure-v1", 7);

        let board = api.leaderboard(10).await.unwrap();
        assert_eq!(board.entries.len(), 10);
        for window in board.entries.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        let ranks: Vec<u32> = board.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=10).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn leaderboard_is_capped_by_available_players() {
        let api = SimulatedSessionApi::seeded("adventure-v1", 7);

        let board = api.leaderboard(50).await.unwrap();
        assert_eq!(board.entries.len(), PLAYER_NAMES.len());
    }

    #[tokio::test]
    async fn sessions_start_fresh_and_track_actions() {
        let api = SimulatedSessionApi::seeded("adventure-v1", 7);

        let session = api.create_session("0xABCD").await.unwrap();
        assert_eq!(session.score, 0);
        assert_eq!(session.position, Position::ORIGIN);
        assert_eq!(session.status, SessionStatus::Active);

        let action = GameAction::move_toward(Direction::North);
        let response = api.submit_action(&session.session_id, &action).await.unwrap();

        let tracked = api.session_status(&session.session_id).await.unwrap();
        assert_eq!(tracked.score, response.new_score);
        assert_eq!(tracked.position, Position { x: 0, y: 1 });
    }

    #[tokio::test]
    async fn distinct_sessions_get_distinct_ids() {
        let api = SimulatedSessionApi::seeded("adventure-v1", 7);

        let a = api.create_session("0x01").await.unwrap();
        let b = api.create_session("0x01").await.unwrap();
        assert_ne!(a.session_id, b.session_id);
    }
}
