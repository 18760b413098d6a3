//! Client runtime configuration.

use std::env;
use std::time::Duration;

/// Configuration for the interactive client loop.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Game identifier used for offline sessions.
    pub game_id: String,

    /// Passive leaderboard refresh period while a session is active.
    pub leaderboard_refresh: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            game_id: "adventure-v1".to_string(),
            leaderboard_refresh: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SESSION_GAME_ID` - Game identifier (default: "adventure-v1")
    /// - `LEADERBOARD_REFRESH_SECS` - Auto-refresh period (default: 30)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(game_id) = env::var("SESSION_GAME_ID") {
            config.game_id = game_id;
        }
        if let Some(secs) = read_env::<u64>("LEADERBOARD_REFRESH_SECS") {
            config.leaderboard_refresh = Duration::from_secs(secs.max(1));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
