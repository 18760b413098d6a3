//! Game session state and reconciliation.
//!
//! This crate owns the session side of the game workflow: the authoritative
//! in-memory copy of one [`GameSession`], the seam to the remote session API,
//! and the reconciliation step that merges a confirmed action's effects into
//! session state.
//!
//! The reconciler refuses to apply anything that is not backed by a
//! [`chain_core::ConfirmedTx`], so score and position can never advance on a
//! failed or pending transaction.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod reconciler;
pub mod simulated;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use api::{ActionResponse, SessionApi};
pub use config::SessionApiConfig;
pub use error::{ApiError, SessionError};
pub use http::HttpSessionApi;
pub use reconciler::{ActionReport, SessionReconciler};
pub use simulated::SimulatedSessionApi;
pub use types::{
    ActionKind, Direction, GameAction, GameInfo, GameSession, LeaderboardData, LeaderboardEntry,
    Position, SessionStatus,
};
