//! Minimum-interval gate in front of the text-generation provider

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};

/// Spaces provider calls at least a configured interval apart.
///
/// There is exactly one provider quota to protect, so one limiter instance
/// is shared by the scheduled and on-demand generation paths. The last-call
/// timestamp lives behind a mutex that is held across the wait: when two
/// callers race, the second waits the full interval measured from the
/// first's acquisition, not from its own arrival.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between acquisitions
    min_interval: Duration,
    /// When the gate was last acquired
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter enforcing `min_interval` between acquisitions.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Waits until the interval since the previous acquisition has elapsed,
    /// records now as the last call time, and returns.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            let ready_at = last + self.min_interval;
            if ready_at > Instant::now() {
                time::sleep_until(ready_at).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
