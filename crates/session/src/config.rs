//! Session API configuration.

use std::env;

/// Connection parameters for the remote session service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionApiConfig {
    /// Base URL, e.g. `https://api.example.io/v1`.
    pub base_url: String,

    /// Bearer credential sent with every request.
    pub api_key: String,

    /// Game identifier sessions are created under.
    pub game_id: String,
}

impl SessionApiConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SESSION_API_URL` - Base URL (required)
    /// - `SESSION_API_KEY` - Bearer credential (required)
    /// - `SESSION_GAME_ID` - Game identifier (default: "adventure-v1")
    ///
    /// Returns `None` when either required variable is missing, which the
    /// composition root treats as "run against the simulated backend".
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("SESSION_API_URL").ok()?;
        let api_key = env::var("SESSION_API_KEY").ok()?;
        let game_id =
            env::var("SESSION_GAME_ID").unwrap_or_else(|_| "adventure-v1".to_string());

        Some(Self {
            base_url,
            api_key,
            game_id,
        })
    }
}
