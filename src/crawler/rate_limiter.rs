//! Dispatch pacing within a batch window

use std::time::Duration;

/// Enforces a fixed spacing between dispatches inside one window
///
/// This governs when a lookup may *start*, not when it finishes. Once
/// dispatched, lookups run concurrently and may complete in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    spacing: Duration,
}

impl RateLimiter {
    pub fn new(spacing: Duration) -> Self {
        Self { spacing }
    }

    /// The delay owed before dispatching the item at `index` in its window
    ///
    /// The first item of a window never waits; a zero spacing never waits.
    pub fn delay_for(&self, index: usize) -> Option<Duration> {
        if index == 0 || self.spacing.is_zero() {
            None
        } else {
            Some(self.spacing)
        }
    }

    /// Waits until the item at `index` may be dispatched
    pub async fn pace(&self, index: usize) {
        if let Some(delay) = self.delay_for(index) {
            tracing::trace!("Pacing dispatch of window item {} by {:?}", index, delay);
            tokio::time::sleep(delay).await;
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }
}
