//! Debounced validity refresh.
//!
//! The form root does not recompute aggregate validity on every change.
//! Each change notification schedules a single pending check a fixed delay
//! in the future, replacing whatever check was pending; the host loop later
//! polls with the current instant and runs the check once it is due.

use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::trace;

/// Default delay between the last change and the validity refresh.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// A pending validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCheck {
    /// Monotonic id; later schedules carry larger tickets.
    pub ticket: u64,
    /// When the check becomes due.
    pub due: Instant,
}

/// Holds at most one pending [`ScheduledCheck`].
///
/// Interior mutability lets change notifiers (which only hold a shared
/// reference) schedule checks.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use schema_forms_engine::ValidityScheduler;
///
/// let scheduler = ValidityScheduler::new(Duration::from_millis(100));
/// let start = Instant::now();
/// scheduler.schedule_at(start);
/// scheduler.schedule_at(start + Duration::from_millis(50));
///
/// assert!(scheduler.take_due(start + Duration::from_millis(120)).is_none());
/// assert!(scheduler.take_due(start + Duration::from_millis(150)).is_some());
/// assert!(scheduler.pending().is_none());
/// ```
#[derive(Debug)]
pub struct ValidityScheduler {
    delay: Duration,
    pending: Cell<Option<ScheduledCheck>>,
    issued: Cell<u64>,
}

impl ValidityScheduler {
    /// Creates a scheduler with the given debounce delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Cell::new(None),
            issued: Cell::new(0),
        }
    }

    /// The debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a check `delay` from now.
    pub fn schedule(&self) -> ScheduledCheck {
        self.schedule_at(Instant::now())
    }

    /// Schedules a check `delay` after `now`, superseding any pending one.
    pub fn schedule_at(&self, now: Instant) -> ScheduledCheck {
        let ticket = self.issued.get() + 1;
        self.issued.set(ticket);
        let check = ScheduledCheck {
            ticket,
            due: now + self.delay,
        };
        if let Some(previous) = self.pending.replace(Some(check)) {
            trace!(superseded = previous.ticket, ticket, "validity check rescheduled");
        }
        check
    }

    /// The pending check, if any.
    pub fn pending(&self) -> Option<ScheduledCheck> {
        self.pending.get()
    }

    /// Drops the pending check, returning it.
    pub fn cancel(&self) -> Option<ScheduledCheck> {
        self.pending.take()
    }

    /// Removes and returns the pending check if it is due at `now`.
    pub fn take_due(&self, now: Instant) -> Option<ScheduledCheck> {
        match self.pending.get() {
            Some(check) if check.due <= now => self.pending.take(),
            _ => None,
        }
    }
}

impl Default for ValidityScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
