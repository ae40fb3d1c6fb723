//! # Wake Timer
//!
//! Scheduler service used by the pump to re-arm itself.
//!
//! ## Philosophy
//!
//! **Time is a service, not a toolkit widget.**
//!
//! The pump never sleeps and never owns a clock. It asks a `WakeTimer` to
//! fire once after a delay, and whoever drives the host (a real event loop,
//! a test, a scripted simulation) calls the pump's tick when the timer fires.
//! This trait does NOT:
//! - Run callbacks itself (the driver does)
//! - Repeat (every wake is one-shot and must be re-armed)
//! - Block
//!
//! ## Design Principles
//!
//! 1. **One-shot**: `schedule_after` replaces any pending wake
//! 2. **Cancellable**: `cancel_pending` leaves the timer disarmed
//! 3. **Observable**: `pending` reports the remaining delay so a driver can wait on it
//! 4. **Clock-agnostic**: Real and virtual clocks implement the same trait

/// One-shot wake-up service
///
/// # Implementation Notes
///
/// - Arming an armed timer supersedes the previous deadline
/// - A disarmed timer never fires
/// - Delays are in milliseconds
pub trait WakeTimer {
    /// Arms the timer to fire once after `delay_ms`
    fn schedule_after(&mut self, delay_ms: u32);

    /// Disarms the timer; nothing fires until the next `schedule_after`
    fn cancel_pending(&mut self);

    /// Returns the remaining delay in milliseconds, or `None` when disarmed
    fn pending(&self) -> Option<u32>;
}

/// Virtual-clock timer
///
/// Time only moves when [`ManualTimer::advance`] is called. Used by tests and
/// by scripted simulation runs, where determinism matters more than wall time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    remaining: Option<u32>,
    last_armed: Option<u32>,
    now_ms: u64,
}

impl ManualTimer {
    /// Creates a disarmed timer at virtual time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances virtual time by up to `ms`
    ///
    /// If the pending wake falls inside the window, time stops at the wake,
    /// the timer disarms, and the unconsumed part of the window is returned.
    /// Returns `None` if nothing fired.
    pub fn advance(&mut self, ms: u32) -> Option<u32> {
        match self.remaining {
            Some(remaining) if remaining <= ms => {
                self.remaining = None;
                self.now_ms += u64::from(remaining);
                Some(ms - remaining)
            }
            Some(remaining) => {
                self.remaining = Some(remaining - ms);
                self.now_ms += u64::from(ms);
                None
            }
            None => {
                self.now_ms += u64::from(ms);
                None
            }
        }
    }

    /// Returns the delay passed to the most recent `schedule_after`
    pub fn last_armed(&self) -> Option<u32> {
        self.last_armed
    }

    /// Returns the current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

impl WakeTimer for ManualTimer {
    fn schedule_after(&mut self, delay_ms: u32) {
        self.remaining = Some(delay_ms);
        self.last_armed = Some(delay_ms);
    }

    fn cancel_pending(&mut self) {
        self.remaining = None;
    }

    fn pending(&self) -> Option<u32> {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_disarmed() {
        let timer = ManualTimer::new();
        assert_eq!(timer.pending(), None);
        assert_eq!(timer.last_armed(), None);
    }

    #[test]
    fn test_advance_fires_and_returns_leftover() {
        let mut timer = ManualTimer::new();
        timer.schedule_after(30);

        assert_eq!(timer.advance(10), None);
        assert_eq!(timer.pending(), Some(20));

        assert_eq!(timer.advance(50), Some(30));
        assert_eq!(timer.pending(), None);
        assert_eq!(timer.now_ms(), 40);
    }

    #[test]
    fn test_schedule_supersedes_previous_wake() {
        let mut timer = ManualTimer::new();
        timer.schedule_after(1000);
        timer.schedule_after(1);
        assert_eq!(timer.pending(), Some(1));
        assert_eq!(timer.advance(1), Some(0));
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut timer = ManualTimer::new();
        timer.schedule_after(5);
        timer.cancel_pending();
        assert_eq!(timer.advance(100), None);
        assert_eq!(timer.now_ms(), 100);
        assert_eq!(timer.last_armed(), Some(5));
    }
}
