//! Pending-redirect flag with a cool-down window

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Lets the first expiry in a burst through and suppresses the rest until the
/// cool-down window has elapsed
#[derive(Debug)]
pub struct RedirectGate {
    cooldown: Duration,
    opened_at: Mutex<Option<Instant>>,
}

impl RedirectGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            opened_at: Mutex::new(None),
        }
    }

    /// Returns true if the caller should perform the redirect
    pub fn try_begin(&self) -> bool {
        let mut opened_at = self.opened_at.lock();
        let now = Instant::now();
        match *opened_at {
            Some(at) if now.duration_since(at) < self.cooldown => false,
            _ => {
                *opened_at = Some(now);
                true
            }
        }
    }

    /// Whether a redirect is still within its cool-down window
    pub fn is_pending(&self) -> bool {
        let opened_at = *self.opened_at.lock();
        opened_at.is_some_and(|at| at.elapsed() < self.cooldown)
    }
}
