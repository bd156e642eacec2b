use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum spacing between requests on one logical channel.
///
/// Each channel owns its own clock. The lock is held across the sleep, so two
/// callers on the same channel can never overlap.
#[derive(Debug)]
pub struct RateLimiter {
    name: &'static str,
    min_interval: Duration,
    last_release: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(name: &'static str, min_interval: Duration) -> Self {
        Self {
            name,
            min_interval,
            last_release: Mutex::new(None),
        }
    }

    /// Sleep until at least `min_interval` has passed since the previous
    /// `wait` on this channel returned. The first call returns immediately.
    pub async fn wait(&self) {
        let mut last = self.last_release.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let pause = self.min_interval - elapsed;
                tracing::trace!(channel = self.name, ?pause, "rate limit pause");
                tokio::time::sleep(pause).await;
            }
        }

        *last = Some(Instant::now());
    }
}
