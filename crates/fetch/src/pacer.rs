//! Global request pacing.
//!
//! One shared "earliest next request allowed" instant guards all outgoing
//! traffic to the site. Callers reserve their slot under the lock and sleep
//! outside it, so waiting requests queue up in arrival order without
//! holding each other's parsing work hostage.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next_slot: Mutex::new(None) }
    }

    /// Block until this caller's slot comes up. The first caller passes
    /// straight through; each subsequent one is spaced at least one
    /// interval after the previous slot.
    pub async fn wait_turn(&self) {
        if self.interval.is_zero() {
            return;
        }
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next_slot.map_or(now, |next| next.max(now));
            *next_slot = Some(slot + self.interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}
