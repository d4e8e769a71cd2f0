use std::cell::Cell;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Time source for every bounded wait in the fill pipeline.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on or advanced. Sleeping returns at once.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    slept: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    /// Total time spent in `sleep`.
    pub fn total_slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + duration);
        self.advance(duration);
    }
}

// ============================================================================
// Wait bounds
// ============================================================================

/// Bounds for the waits the pipeline performs, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Page counts as ready after this long without a mutation.
    pub page_quiet_ms: u64,
    /// Absolute cap on the page-ready wait.
    pub page_cap_ms: u64,
    /// Cap on waiting for a custom dropdown to render its options.
    pub dropdown_observe_ms: u64,
    pub dropdown_poll_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            page_quiet_ms: 500,
            page_cap_ms: 5000,
            dropdown_observe_ms: 700,
            dropdown_poll_ms: 50,
        }
    }
}

impl Timings {
    pub fn page_quiet(&self) -> Duration {
        Duration::from_millis(self.page_quiet_ms)
    }

    pub fn page_cap(&self) -> Duration {
        Duration::from_millis(self.page_cap_ms)
    }

    pub fn dropdown_observe(&self) -> Duration {
        Duration::from_millis(self.dropdown_observe_ms)
    }

    pub fn dropdown_poll(&self) -> Duration {
        Duration::from_millis(self.dropdown_poll_ms.max(1))
    }
}
