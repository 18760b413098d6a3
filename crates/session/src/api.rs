//! Session API seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::{GameAction, GameInfo, GameSession, LeaderboardData};

/// Server response to one submitted action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    /// Whether the action had its intended effect. A blocked move is still a
    /// successful remote call.
    pub success: bool,

    /// Score delta awarded for this action.
    pub new_score: i64,

    /// Human-readable result line for the player.
    pub message: String,
}

/// Remote game session API.
///
/// Implementations: [`crate::HttpSessionApi`] for the real service,
/// [`crate::SimulatedSessionApi`] for offline play and demos.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Create a session for a wallet address.
    async fn create_session(&self, user_wallet: &str) -> Result<GameSession, ApiError>;

    /// Fetch the current server-side record of a session.
    async fn session_status(&self, session_id: &str) -> Result<GameSession, ApiError>;

    /// Submit one action for processing.
    async fn submit_action(
        &self,
        session_id: &str,
        action: &GameAction,
    ) -> Result<ActionResponse, ApiError>;

    /// Fetch the top `limit` leaderboard entries.
    async fn leaderboard(&self, limit: usize) -> Result<LeaderboardData, ApiError>;

    /// List joinable games.
    async fn available_games(&self) -> Result<Vec<GameInfo>, ApiError>;
}
