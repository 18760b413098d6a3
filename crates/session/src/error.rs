//! Error types for session operations.

use thiserror::Error;

/// Transport-level errors from a session API implementation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("api returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed api response: {0}")]
    Decode(String),
}

/// Errors surfaced by the reconciler.
///
/// Every failure leaves the local session untouched; the same operation can
/// simply be re-invoked.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to create game session")]
    SessionCreateFailed(#[source] ApiError),

    #[error("remote call failed, session state unchanged")]
    RemoteActionFailed(#[source] ApiError),

    #[error("no active session")]
    NoSession,
}
