//! Bounded polling primitive.

use std::future::Future;
use std::time::Duration;

use tokio::time;

/// Attempt ceiling and spacing for a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// Receipt polling default: 30 attempts at 1s, a 30 second window.
    pub const fn receipt_default() -> Self {
        Self::new(30, Duration::from_secs(1))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::receipt_default()
    }
}

/// Run `probe` until it yields a value or the attempt ceiling is reached.
///
/// Sleeps one interval before each probe, so the full window is
/// `attempts * interval`. Returns `None` on exhaustion; the probe decides
/// what counts as "not yet" (including transient probe errors).
pub async fn poll_until<T, F, Fut>(policy: PollPolicy, mut probe: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..policy.attempts {
        time::sleep(policy.interval).await;
        if let Some(value) = probe().await {
            return Some(value);
        }
    }
    None
}
