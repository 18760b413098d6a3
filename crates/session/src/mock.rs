//! Mock session API for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ActionResponse, SessionApi};
use crate::error::ApiError;
use crate::types::{
    ActionKind, GameAction, GameInfo, GameSession, LeaderboardData, LeaderboardEntry, Position,
    SessionStatus,
};

/// Scriptable in-memory session API.
///
/// Serves one session with deterministic responses; failures are toggled per
/// operation family.
pub struct MockSessionApi {
    state: Mutex<MockState>,
}

struct MockState {
    session: Option<GameSession>,
    response: ActionResponse,
    fail_create: bool,
    fail_actions: bool,
    submitted: Vec<(String, GameAction)>,
}

impl MockSessionApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                session: None,
                response: ActionResponse {
                    success: true,
                    new_score: 20,
                    message: "Moved north! Found treasure worth 20 points!".to_string(),
                },
                fail_create: false,
                fail_actions: false,
                submitted: Vec::new(),
            }),
        }
    }

    /// Response returned for every subsequent `submit_action`.
    pub fn set_response(&self, response: ActionResponse) {
        self.state.lock().unwrap().response = response;
    }

    pub fn fail_create(&self) {
        self.state.lock().unwrap().fail_create = true;
    }

    pub fn fail_actions(&self) {
        self.state.lock().unwrap().fail_actions = true;
    }

    /// Overwrite the server-side session score (for resync scenarios).
    pub fn set_server_score(&self, score: i64) {
        if let Some(session) = self.state.lock().unwrap().session.as_mut() {
            session.score = score;
        }
    }

    /// Actions submitted so far, with their session ids.
    pub fn submitted(&self) -> Vec<(String, GameAction)> {
        self.state.lock().unwrap().submitted.clone()
    }
}

impl Default for MockSessionApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionApi for MockSessionApi {
    async fn create_session(&self, user_wallet: &str) -> Result<GameSession, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(ApiError::Transport("connection refused".to_string()));
        }

        let session = GameSession {
            session_id: "session_1_test".to_string(),
            game_id: "adventure-v1".to_string(),
            user_wallet: user_wallet.to_string(),
            status: SessionStatus::Active,
            score: 0,
            position: Position::ORIGIN,
            created_at: 0,
        };
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn session_status(&self, session_id: &str) -> Result<GameSession, ApiError> {
        self.state
            .lock()
            .unwrap()
            .session
            .as_ref()
            .filter(|s| s.session_id == session_id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                body: "session not found".to_string(),
            })
    }

    async fn submit_action(
        &self,
        session_id: &str,
        action: &GameAction,
    ) -> Result<ActionResponse, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_actions {
            return Err(ApiError::Transport("connection reset".to_string()));
        }

        state
            .submitted
            .push((session_id.to_string(), action.clone()));

        let response = state.response.clone();
        // Track the action server-side too, so resync has something real.
        if let Some(session) = state.session.as_mut() {
            session.score += response.new_score;
            if action.kind == ActionKind::Move
                && let Some(direction) = action.direction
            {
                session.position.step(direction);
            }
        }
        Ok(response)
    }

    async fn leaderboard(&self, limit: usize) -> Result<LeaderboardData, ApiError> {
        let entries: Vec<LeaderboardEntry> = [(1u32, "Alice", 900i64), (2, "Bob", 500), (3, "Carol", 100)]
            .into_iter()
            .take(limit)
            .map(|(rank, username, score)| LeaderboardEntry {
                rank,
                username: username.to_string(),
                wallet: format!("0x{rank:040x}"),
                score,
                games_played: rank,
            })
            .collect();

        Ok(LeaderboardData {
            game_id: "adventure-v1".to_string(),
            entries,
            total_players: 3,
            last_updated: 0,
        })
    }

    async fn available_games(&self) -> Result<Vec<GameInfo>, ApiError> {
        Ok(vec![GameInfo {
            id: "adventure-v1".to_string(),
            name: "Adventure".to_string(),
            description: "Test game".to_string(),
            players: 1,
        }])
    }
}
