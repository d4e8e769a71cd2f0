use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::fill::clock::{Clock, Timings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReadyOutcome {
    /// No mutation for a full quiet period.
    Quiet { elapsed_ms: u64 },
    /// Mutations kept coming until the cap.
    Capped { elapsed_ms: u64 },
}

/// Debounced wait: returns once `mutation_count` has not changed for the
/// quiet period, or when the cap is reached. Every observed change restarts
/// the quiet period.
pub fn wait_until_quiet<F>(clock: &dyn Clock, timings: &Timings, mut mutation_count: F) -> ReadyOutcome
where
    F: FnMut() -> u64,
{
    let start = clock.now();
    let quiet = timings.page_quiet();
    let cap = timings.page_cap();
    let step = quiet.min(timings.dropdown_poll()).max(Duration::from_millis(1));

    let mut last_count = mutation_count();
    let mut last_change = start;

    loop {
        let now = clock.now();
        let elapsed = now.saturating_sub(start);
        if now.saturating_sub(last_change) >= quiet {
            debug!(elapsed_ms = elapsed.as_millis() as u64, "page quiet");
            return ReadyOutcome::Quiet {
                elapsed_ms: elapsed.as_millis() as u64,
            };
        }
        if elapsed >= cap {
            debug!(elapsed_ms = elapsed.as_millis() as u64, "page-ready wait capped");
            return ReadyOutcome::Capped {
                elapsed_ms: elapsed.as_millis() as u64,
            };
        }

        clock.sleep(step);

        let count = mutation_count();
        if count != last_count {
            last_count = count;
            last_change = clock.now();
        }
    }
}

/// Settle time for a document the caller holds. Nothing can mutate it while
/// it is borrowed, so this is one quiet period bounded by the cap. Hosts with
/// a live mutation counter use [`wait_until_quiet`] instead.
pub fn wait_for_page_ready(clock: &dyn Clock, timings: &Timings) -> ReadyOutcome {
    let quiet = timings.page_quiet();
    let cap = timings.page_cap();
    if quiet > cap {
        clock.sleep(cap);
        debug!(elapsed_ms = cap.as_millis() as u64, "page-ready wait capped");
        return ReadyOutcome::Capped {
            elapsed_ms: cap.as_millis() as u64,
        };
    }
    clock.sleep(quiet);
    debug!(elapsed_ms = quiet.as_millis() as u64, "page quiet");
    ReadyOutcome::Quiet {
        elapsed_ms: quiet.as_millis() as u64,
    }
}
