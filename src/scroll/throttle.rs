use std::time::Duration;
use tokio::time::Instant;

/// Fixed-window, trailing-edge rate limiter.
///
/// The first item opens a window; later items inside it overwrite the pending
/// one. Once the window closes, `poll` hands back only the most recent item.
#[derive(Debug)]
pub struct TrailingThrottle<T> {
    window: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> TrailingThrottle<T> {
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None, pending: None }
    }

    pub fn offer(&mut self, now: Instant, item: T) {
        if self.deadline.is_none() {
            self.deadline = Some(now + self.window);
        }
        self.pending = Some(item);
    }

    /// When the open window closes, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }
}
