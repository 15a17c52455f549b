//! Fixed-interval pacing for rate-limited APIs
//!
//! NCBI E-utilities allow about three requests per second without an API key,
//! and the CrossRef / Europe PMC lookups are paced as a courtesy. Requests are
//! issued strictly one after another, so a fixed pause between calls is all
//! the pacing needed; there is no shared token state.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, instrument};

/// Sleeps a fixed interval on every [`pause`](Throttle::pause)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
}

impl Throttle {
    /// Create a throttle with the given pause
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_authorscan::Throttle;
    /// use std::time::Duration;
    ///
    /// let throttle = Throttle::new(Duration::from_millis(340));
    /// assert_eq!(throttle.interval(), Duration::from_millis(340));
    /// ```
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// A throttle that never sleeps
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the configured interval
    #[instrument(skip(self), fields(interval_ms = self.interval.as_millis() as u64))]
    pub async fn pause(&self) {
        if self.interval.is_zero() {
            return;
        }
        debug!("Sleeping to respect rate limit");
        sleep(self.interval).await;
    }
}
