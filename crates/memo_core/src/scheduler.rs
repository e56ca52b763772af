//! Deferred save scheduling (debounce).
//!
//! # Responsibility
//! - Provide a cancellable one-shot deadline used to coalesce saves.
//! - Keep timing out of session business logic.
//!
//! # Invariants
//! - At most one deadline is pending; `schedule` replaces it (last write wins).
//! - `take_due` reports a deadline at most once.

use std::time::{Duration, Instant};

/// Default delay between the last mutation and the coalesced write.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(400);

/// Cancellable one-shot deadline.
pub trait SaveScheduler {
    /// Arms the deadline `delay` from now, replacing any pending one.
    fn schedule(&mut self, delay: Duration);
    /// Drops the pending deadline, if any.
    fn cancel(&mut self);
    fn is_pending(&self) -> bool;
    /// Returns `true` once when the pending deadline has elapsed, disarming it.
    fn take_due(&mut self) -> bool;
}

/// Wall-clock scheduler backed by [`Instant`]; the host loop polls
/// [`SaveScheduler::take_due`].
#[derive(Debug, Default)]
pub struct Debouncer {
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left until the pending deadline, or `None` when idle.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl SaveScheduler for Debouncer {
    fn schedule(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Virtual-time scheduler advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    deadline: Option<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves virtual time forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl SaveScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) {
        self.deadline = Some(self.now + delay);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Debouncer, ManualScheduler, SaveScheduler};
    use std::time::Duration;

    #[test]
    fn manual_reschedule_pushes_deadline_back() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(400));
        scheduler.advance(Duration::from_millis(300));
        scheduler.schedule(Duration::from_millis(400));
        scheduler.advance(Duration::from_millis(300));
        assert!(!scheduler.take_due());

        scheduler.advance(Duration::from_millis(100));
        assert!(scheduler.take_due());
        assert!(!scheduler.take_due());
    }

    #[test]
    fn cancel_clears_pending_deadline() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::ZERO);
        scheduler.cancel();
        assert!(!scheduler.is_pending());
        assert!(!scheduler.take_due());
    }

    #[test]
    fn debouncer_with_zero_delay_is_due_immediately() {
        let mut debouncer = Debouncer::new();
        debouncer.schedule(Duration::ZERO);
        assert!(debouncer.take_due());
        assert_eq!(debouncer.remaining(), None);
    }
}
