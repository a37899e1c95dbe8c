//! Cancellable delayed trigger, polled from the tick loop
//!
//! Scheduling while a trigger is pending restarts the delay rather than
//! stacking a second one, so a burst of keystrokes fires exactly once,
//! 500 ms after the last of them.

use std::time::{Duration, Instant};

pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Arm (or re-arm) the trigger `delay` from now.
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop any pending trigger without firing it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once per armed deadline, on the first poll at or past it.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(FILTER_DEBOUNCE)
    }
}
