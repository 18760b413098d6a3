//! Game session, action, and leaderboard types.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Milliseconds since the Unix epoch.
pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Lifecycle state of a game session.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

/// Kind of in-game action.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Move,
    Collect,
    Attack,
    Defend,
}

/// Cardinal direction for move actions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Unit step for this direction. Moves are always single-axis.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// Grid position within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Step one unit in the given direction.
    pub fn step(&mut self, direction: Direction) {
        let (dx, dy) = direction.delta();
        self.x += dx;
        self.y += dy;
    }
}

/// Server-tracked logical game state for one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub session_id: String,
    pub game_id: String,
    pub user_wallet: String,
    pub status: SessionStatus,
    pub score: i64,
    pub position: Position,

    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// One user input, consumed by exactly one reconciliation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,

    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: u64,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl GameAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            direction: None,
            timestamp: unix_millis(),
            metadata: Map::new(),
        }
    }

    pub fn move_toward(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Self::new(ActionKind::Move)
        }
    }

    /// Label under which this action is recorded on chain,
    /// e.g. `move_north` or `action_collect`.
    pub fn chain_label(&self) -> String {
        match (self.kind, self.direction) {
            (ActionKind::Move, Some(direction)) => format!("move_{direction}"),
            (kind, _) => format!("action_{kind}"),
        }
    }
}

/// One row of the leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub wallet: String,
    pub score: i64,
    pub games_played: u32,
}

/// Leaderboard snapshot for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardData {
    pub game_id: String,
    pub entries: Vec<LeaderboardEntry>,
    pub total_players: u32,

    /// Snapshot time, milliseconds since the Unix epoch.
    pub last_updated: u64,
}

/// Catalogue entry for a joinable game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub players: u32,
}
