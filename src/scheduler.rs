//! Periodic worker cadence.
//!
//! The main loop drains the inbound channels without blocking, polls the
//! timer, then sleeps for at most a short idle slice, cut shorter when the
//! timer is due sooner. The timer is armed when the broker session comes up
//! and fires immediately, then once per interval.
//!
//! ```text
//!   inbox (bounded) ──┐
//!                     ├──▶ main loop ──▶ RoomService.handle_message()
//!   PeriodicTimer ────┘               └─▶ RoomService.worker_tick()
//! ```

use log::{debug, info};

// ═══════════════════════════════════════════════════════════════
//  PeriodicTimer
// ═══════════════════════════════════════════════════════════════

/// Fixed-interval timer driven by a monotonic millisecond clock.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    label: &'static str,
    interval_ms: u64,
    /// `None` until [`arm`](Self::arm) is called.
    next_due_ms: Option<u64>,
    fired: u64,
}

impl PeriodicTimer {
    pub fn new(label: &'static str, interval_ms: u64) -> Self {
        Self {
            label,
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
            fired: 0,
        }
    }

    /// Start (or restart) the cadence; the first fire is due at `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        info!("Scheduler: '{}' armed (every {} ms)", self.label, self.interval_ms);
        self.next_due_ms = Some(now_ms);
    }

    pub fn disarm(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Returns `true` when the timer is due and schedules the next fire.
    ///
    /// A loop that falls behind fires once and skips the missed intervals
    /// rather than bursting.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(due) = self.next_due_ms else {
            return false;
        };
        if now_ms < due {
            return false;
        }

        let missed = (now_ms - due) / self.interval_ms;
        if missed > 0 {
            debug!("Scheduler: '{}' skipped {} interval(s)", self.label, missed);
        }
        self.next_due_ms = Some(due + (missed + 1) * self.interval_ms);
        self.fired += 1;
        true
    }

    /// Milliseconds until the next fire; `None` while disarmed.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.next_due_ms.map(|due| due.saturating_sub(now_ms))
    }

    /// How long the loop may sleep: `max_ms`, or less if the timer is due
    /// sooner.
    pub fn idle_ms(&self, now_ms: u64, max_ms: u64) -> u64 {
        self.remaining_ms(now_ms).map_or(max_ms, |ms| ms.min(max_ms))
    }

    /// Number of times the timer has fired.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
