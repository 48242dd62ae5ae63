// Rust guideline compliant 2026-10-12

//! Wall-clock adapter for the `Sleeper` port.

use std::time::Duration;

use domain::Sleeper;

/// Backoff clock backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::TokioSleeper;
    use domain::Sleeper as _;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_the_requested_duration() {
        let before = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(2)).await;
        assert!(before.elapsed() >= Duration::from_secs(2));
    }
}
