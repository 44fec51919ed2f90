use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use super::mock_signaling::OutgoingSignal;

/// Timeout for signal exchange operations (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 2000;

/// Wait for the next outgoing signal, giving up after `timeout_ms`.
pub async fn next_signal(
    signal_rx: &mut mpsc::UnboundedReceiver<OutgoingSignal>,
    timeout_ms: u64,
) -> Option<OutgoingSignal> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), signal_rx.recv())
        .await
        .ok()
        .flatten()
}

/// Poll `condition` until it holds or `timeout_ms` elapses.
pub async fn wait_until<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    while start.elapsed() < timeout {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition().await
}
