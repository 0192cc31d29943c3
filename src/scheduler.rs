use std::time::{Duration, Instant};

/// Trailing-edge debounce with an explicit clock.
///
/// Every `schedule` pushes the deadline out to `now + delay`; `fire` reports
/// once when the deadline has passed.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending deadline and reschedule from `now`.
    pub fn schedule(&mut self, now: Instant) {
        let deadline = now + self.delay;
        tracing::trace!(delay_ms = self.delay.as_millis() as u64, "debounce rescheduled");
        self.deadline = Some(deadline);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending deadline if it has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                tracing::trace!("debounce fired");
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending deadline regardless of the clock.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
