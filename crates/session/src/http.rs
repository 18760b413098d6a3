//! HTTP session API client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::api::{ActionResponse, SessionApi};
use crate::config::SessionApiConfig;
use crate::error::ApiError;
use crate::types::{GameAction, GameInfo, GameSession, LeaderboardData};

/// Session API client for the remote game service.
///
/// Endpoints:
/// - `POST /sessions` - create a session
/// - `GET /sessions/{id}` - session status
/// - `POST /sessions/{id}/actions` - submit an action
/// - `GET /leaderboard?limit=N` - leaderboard snapshot
/// - `GET /games` - joinable games
pub struct HttpSessionApi {
    config: SessionApiConfig,
    http: reqwest::Client,
}

impl HttpSessionApi {
    pub fn new(config: SessionApiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.config.game_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a prepared request and decode its JSON body.
    ///
    /// The body is read as text first so decode failures can report the raw
    /// response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%status, "session api response");
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("{e}; raw response: {body}")))
    }
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn create_session(&self, user_wallet: &str) -> Result<GameSession, ApiError> {
        let request = self.http.post(self.endpoint("/sessions")).json(&json!({
            "gameId": self.config.game_id,
            "userWallet": user_wallet,
        }));
        self.execute(request).await
    }

    async fn session_status(&self, session_id: &str) -> Result<GameSession, ApiError> {
        let request = self
            .http
            .get(self.endpoint(&format!("/sessions/{session_id}")));
        self.execute(request).await
    }

    async fn submit_action(
        &self,
        session_id: &str,
        action: &GameAction,
    ) -> Result<ActionResponse, ApiError> {
        let request = self
            .http
            .post(self.endpoint(&format!("/sessions/{session_id}/actions")))
            .json(action);
        self.execute(request).await
    }

    async fn leaderboard(&self, limit: usize) -> Result<LeaderboardData, ApiError> {
        let request = self
            .http
            .get(self.endpoint("/leaderboard"))
            .query(&[("limit", limit)]);
        self.execute(request).await
    }

    async fn available_games(&self) -> Result<Vec<GameInfo>, ApiError> {
        let request = self.http.get(self.endpoint("/games"));
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpSessionApi {
        HttpSessionApi::new(SessionApiConfig {
            base_url: "https://api.example.io/v1/".to_string(),
            api_key: "secret".to_string(),
            game_id: "adventure-v1".to_string(),
        })
    }

    #[test]
    fn endpoints_join_without_duplicate_slashes() {
        let api = api();
        assert_eq!(api.endpoint("/sessions"), "https://api.example.io/v1/sessions");
        assert_eq!(
            api.endpoint("/sessions/s1/actions"),
            "https://api.example.io/v1/sessions/s1/actions"
        );
    }

    #[test]
    fn action_responses_decode_from_wire_json() {
        let response: ActionResponse = serde_json::from_str(
            r#"{"success":true,"newScore":35,"message":"Moved north! Found treasure worth 35 points!"}"#,
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(response.new_score, 35);
    }
}
