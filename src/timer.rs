use std::time::Duration;

/// One-shot countdown advanced by the caller's clock.
///
/// Nothing runs in the background: the event loop feeds elapsed time through
/// [`Timer::advance`], and a cancelled timer simply stops counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    delay: Duration,
    remaining: Option<Duration>,
}

impl Timer {
    /// Created stopped.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            remaining: None,
        }
    }

    /// (Re)starts the countdown from the full delay.
    pub fn start(&mut self) {
        self.remaining = Some(self.delay);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Returns true exactly once, on the call that uses up the delay.
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(left) if dt >= left => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }
}
