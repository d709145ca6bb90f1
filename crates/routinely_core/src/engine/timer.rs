//! Active timers for in-progress timed tasks.
//!
//! # Responsibility
//! - Start and stop timing sessions for (kid, task) pairs.
//! - Convert a stopped session into whole elapsed seconds.
//!
//! # Invariants
//! - At most one active timer exists per (kid, task) pair; starting again
//!   replaces the prior session and discards its start time.
//! - Stopping never writes a completion; the caller records the elapsed
//!   time separately.

use crate::engine::{EngineError, EngineResult};
use crate::model::document::AppDocument;
use crate::model::record::ActiveTimer;

/// Starts (or restarts) the timer for one (kid, task) pair at `now_ms`.
pub fn start_timer(
    doc: &AppDocument,
    kid_id: &str,
    task_id: &str,
    now_ms: i64,
) -> EngineResult<AppDocument> {
    if !doc.kids.iter().any(|kid| kid.id == kid_id) {
        return Err(EngineError::UnknownKid(kid_id.to_string()));
    }
    if !doc.tasks.iter().any(|task| task.id == task_id) {
        return Err(EngineError::UnknownTask(task_id.to_string()));
    }

    let mut next = doc.clone();
    next.active_timers
        .retain(|timer| !(timer.kid_id == kid_id && timer.task_id == task_id));
    next.active_timers.push(ActiveTimer {
        kid_id: kid_id.to_string(),
        task_id: task_id.to_string(),
        start_time: now_ms,
    });
    Ok(next)
}

/// Stops the pair's timer at `now_ms`.
///
/// With no active timer the document comes back unchanged and the elapsed
/// time is `None`: a soft miss, not an error. Otherwise the timer is
/// removed and the rounded elapsed seconds returned.
pub fn stop_timer(
    doc: &AppDocument,
    kid_id: &str,
    task_id: &str,
    now_ms: i64,
) -> (AppDocument, Option<u32>) {
    let Some(timer) = doc
        .active_timers
        .iter()
        .find(|timer| timer.kid_id == kid_id && timer.task_id == task_id)
    else {
        return (doc.clone(), None);
    };

    let elapsed = elapsed_seconds(timer.start_time, now_ms);
    let mut next = doc.clone();
    next.active_timers
        .retain(|timer| !(timer.kid_id == kid_id && timer.task_id == task_id));
    (next, Some(elapsed))
}

/// Rounds a millisecond interval to whole seconds. A clock that went
/// backwards yields zero rather than a bogus huge value.
fn elapsed_seconds(start_ms: i64, now_ms: i64) -> u32 {
    let delta = now_ms - start_ms;
    if delta <= 0 {
        return 0;
    }
    ((delta + 500) / 1000) as u32
}

#[cfg(test)]
mod tests {
    use super::elapsed_seconds;

    #[test]
    fn elapsed_rounds_to_nearest_second() {
        assert_eq!(elapsed_seconds(0, 1_499), 1);
        assert_eq!(elapsed_seconds(0, 1_500), 2);
        assert_eq!(elapsed_seconds(1_000, 13_400), 12);
    }

    #[test]
    fn elapsed_clamps_backwards_clock_to_zero() {
        assert_eq!(elapsed_seconds(10_000, 9_000), 0);
    }
}
