//! Session reconciliation.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use chain_core::ConfirmedTx;

use crate::api::SessionApi;
use crate::error::SessionError;
use crate::types::{ActionKind, GameAction, GameInfo, GameSession, LeaderboardData};

/// Result of applying one confirmed action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionReport {
    /// Session state after the merge.
    pub session: GameSession,

    /// Human-readable result line from the remote service.
    pub message: String,

    /// Score delta that was merged.
    pub score_delta: i64,
}

/// Maintains the authoritative local copy of one [`GameSession`] and
/// synchronizes it with the remote API after each confirmed action.
///
/// An action enters only via [`apply_action`](Self::apply_action), which
/// demands a [`ConfirmedTx`]; score and position can never advance on a
/// failed or pending transaction. Remote failures leave the local copy
/// untouched, so every operation can simply be re-invoked.
pub struct SessionReconciler {
    api: Arc<dyn SessionApi>,
    session: Option<GameSession>,
}

impl SessionReconciler {
    pub fn new(api: Arc<dyn SessionApi>) -> Self {
        Self { api, session: None }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Request a new session from the remote API and adopt it locally.
    pub async fn start_session(
        &mut self,
        wallet_address: &str,
    ) -> Result<GameSession, SessionError> {
        let session = self
            .api
            .create_session(wallet_address)
            .await
            .map_err(SessionError::SessionCreateFailed)?;

        info!(session_id = %session.session_id, wallet = wallet_address, "game session started");
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Apply a confirmed action: submit it remotely, then merge the returned
    /// score delta and, for moves, a single-axis unit position step.
    pub async fn apply_action(
        &mut self,
        mut action: GameAction,
        confirmed: &ConfirmedTx,
    ) -> Result<ActionReport, SessionError> {
        let session_id = self
            .session
            .as_ref()
            .ok_or(SessionError::NoSession)?
            .session_id
            .clone();

        // Tag the action with its confirmation before it leaves the client.
        action.metadata.insert(
            "txHash".to_string(),
            Value::String(confirmed.hash().to_string()),
        );
        if let Some(block) = confirmed.block_number() {
            action
                .metadata
                .insert("blockNumber".to_string(), Value::from(block));
        }

        let response = self
            .api
            .submit_action(&session_id, &action)
            .await
            .map_err(SessionError::RemoteActionFailed)?;

        // Merge only now; any failure above has left the session untouched.
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::NoSession);
        };
        session.score += response.new_score;
        if action.kind == ActionKind::Move
            && let Some(direction) = action.direction
        {
            session.position.step(direction);
        }

        debug!(
            session_id = %session.session_id,
            score = session.score,
            position = ?session.position,
            tx = confirmed.hash(),
            "action reconciled"
        );

        Ok(ActionReport {
            session: session.clone(),
            message: response.message,
            score_delta: response.new_score,
        })
    }

    /// Replace the local copy with the server-side record.
    ///
    /// Position is derived locally between reconciliations, so this is the
    /// way to heal drift against the remote service.
    pub async fn resync(&mut self) -> Result<GameSession, SessionError> {
        let session_id = self
            .session
            .as_ref()
            .ok_or(SessionError::NoSession)?
            .session_id
            .clone();

        let session = self
            .api
            .session_status(&session_id)
            .await
            .map_err(SessionError::RemoteActionFailed)?;
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Read-only leaderboard fetch; never mutates session state.
    pub async fn fetch_leaderboard(&self, limit: usize) -> Result<LeaderboardData, SessionError> {
        self.api
            .leaderboard(limit)
            .await
            .map_err(SessionError::RemoteActionFailed)
    }

    /// Read-only listing of joinable games.
    pub async fn available_games(&self) -> Result<Vec<GameInfo>, SessionError> {
        self.api
            .available_games()
            .await
            .map_err(SessionError::RemoteActionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chain_core::{ChainError, TransactionOutcome};

    use crate::api::ActionResponse;
    use crate::mock::MockSessionApi;
    use crate::types::{Direction, Position};

    const WALLET: &str = "0xABCDabcdABCDabcdABCDabcdABCDabcd00001234";

    fn confirmed() -> ConfirmedTx {
        let outcome = TransactionOutcome {
            hash: Some("0xabc".to_string()),
            success: true,
            block_number: Some(7),
            gas_used: Some("21000".to_string()),
            error: None,
        };
        ConfirmedTx::try_from(&outcome).expect("successful outcome converts")
    }

    #[tokio::test]
    async fn start_session_begins_at_origin() {
        let api = Arc::new(MockSessionApi::new());
        let mut reconciler = SessionReconciler::new(api);

        let session = reconciler.start_session(WALLET).await.unwrap();
        assert_eq!(session.score, 0);
        assert_eq!(session.position, Position::ORIGIN);
        assert_eq!(session.user_wallet, WALLET);
    }

    #[tokio::test]
    async fn move_north_merges_delta_and_steps_position() {
        let api = Arc::new(MockSessionApi::new());
        api.set_response(ActionResponse {
            success: true,
            new_score: 20,
            message: "Moved north! Found treasure worth 20 points!".to_string(),
        });
        let mut reconciler =
            SessionReconciler::new(Arc::clone(&api) as Arc<dyn SessionApi>);
        reconciler.start_session(WALLET).await.unwrap();

        let report = reconciler
            .apply_action(GameAction::move_toward(Direction::North), &confirmed())
            .await
            .unwrap();

        assert_eq!(report.session.score, 20);
        assert_eq!(report.session.position, Position { x: 0, y: 1 });
        assert_eq!(report.score_delta, 20);
        assert!(report.message.contains("Moved north"));

        // The submitted action carries its confirmation reference.
        let submitted = api.submitted();
        assert_eq!(submitted.len(), 1);
        let (_, action) = &submitted[0];
        assert_eq!(action.metadata["txHash"], "0xabc");
        assert_eq!(action.metadata["blockNumber"], 7);
    }

    #[tokio::test]
    async fn moves_are_single_axis_unit_steps() {
        let cases = [
            (Direction::North, Position { x: 0, y: 1 }),
            (Direction::South, Position { x: 0, y: -1 }),
            (Direction::East, Position { x: 1, y: 0 }),
            (Direction::West, Position { x: -1, y: 0 }),
        ];

        for (direction, expected) in cases {
            let api = Arc::new(MockSessionApi::new());
            api.set_response(ActionResponse {
                success: true,
                new_score: 0,
                message: String::new(),
            });
            let mut reconciler = SessionReconciler::new(api);
            reconciler.start_session(WALLET).await.unwrap();

            let report = reconciler
                .apply_action(GameAction::move_toward(direction), &confirmed())
                .await
                .unwrap();
            assert_eq!(report.session.position, expected, "direction: {direction}");
        }
    }

    #[tokio::test]
    async fn non_move_actions_leave_position_alone() {
        let api = Arc::new(MockSessionApi::new());
        api.set_response(ActionResponse {
            success: true,
            new_score: 35,
            message: "Action collect successful! Gained 35 points!".to_string(),
        });
        let mut reconciler = SessionReconciler::new(api);
        reconciler.start_session(WALLET).await.unwrap();

        let report = reconciler
            .apply_action(GameAction::new(ActionKind::Collect), &confirmed())
            .await
            .unwrap();
        assert_eq!(report.session.score, 35);
        assert_eq!(report.session.position, Position::ORIGIN);
    }

    #[tokio::test]
    async fn apply_action_requires_an_active_session() {
        let api = Arc::new(MockSessionApi::new());
        let mut reconciler = SessionReconciler::new(api);

        let result = reconciler
            .apply_action(GameAction::move_toward(Direction::North), &confirmed())
            .await;
        assert!(matches!(result, Err(SessionError::NoSession)));
    }

    #[tokio::test]
    async fn failed_outcomes_cannot_reach_the_reconciler() {
        // The gate is the ConfirmedTx constructor: no confirmation value,
        // no way to call apply_action.
        let reverted = TransactionOutcome::unconfirmed("0xabc".to_string(), ChainError::OnChainFailure);
        assert!(ConfirmedTx::try_from(&reverted).is_err());

        let pending = TransactionOutcome::rejected(ChainError::Timeout);
        assert!(ConfirmedTx::try_from(&pending).is_err());
    }

    #[tokio::test]
    async fn remote_failure_leaves_the_session_untouched() {
        let api = Arc::new(MockSessionApi::new());
        let mut reconciler =
            SessionReconciler::new(Arc::clone(&api) as Arc<dyn SessionApi>);
        reconciler.start_session(WALLET).await.unwrap();
        api.fail_actions();

        let before = reconciler.session().cloned().unwrap();
        let result = reconciler
            .apply_action(GameAction::move_toward(Direction::East), &confirmed())
            .await;

        assert!(matches!(result, Err(SessionError::RemoteActionFailed(_))));
        assert_eq!(reconciler.session(), Some(&before));
    }

    #[tokio::test]
    async fn create_failure_maps_to_session_create_failed() {
        let api = Arc::new(MockSessionApi::new());
        api.fail_create();
        let mut reconciler = SessionReconciler::new(api);

        let result = reconciler.start_session(WALLET).await;
        assert!(matches!(result, Err(SessionError::SessionCreateFailed(_))));
        assert!(reconciler.session().is_none());
    }

    #[tokio::test]
    async fn leaderboard_fetch_never_mutates_the_session() {
        let api = Arc::new(MockSessionApi::new());
        let mut reconciler = SessionReconciler::new(api);
        reconciler.start_session(WALLET).await.unwrap();

        let before = reconciler.session().cloned();
        let board = reconciler.fetch_leaderboard(3).await.unwrap();
        assert!(!board.entries.is_empty());
        for window in board.entries.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        assert_eq!(reconciler.session(), before.as_ref());
    }

    #[tokio::test]
    async fn resync_adopts_the_server_record() {
        let api = Arc::new(MockSessionApi::new());
        let mut reconciler =
            SessionReconciler::new(Arc::clone(&api) as Arc<dyn SessionApi>);
        reconciler.start_session(WALLET).await.unwrap();

        api.set_server_score(99);
        let session = reconciler.resync().await.unwrap();
        assert_eq!(session.score, 99);
        assert_eq!(reconciler.session().map(|s| s.score), Some(99));
    }
}
