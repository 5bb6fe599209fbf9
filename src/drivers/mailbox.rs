//! Single-slot, latest-wins hand-off of display requests.
//!
//! Uses an `embassy-sync` [`Signal`] so the poller (sync) can post from any
//! thread while the pattern runner (async) waits on it.  Posting over an
//! undelivered request replaces it: a stale colour is acceptable, a backlog
//! of stale colours is not.
//!
//! ```text
//! ┌──────────────┐  ColorState  ┌────────────────┐
//! │    Poller    │─────────────▶│ Pattern runner │
//! │    (sync)    │  (1 slot)    │    (async)     │
//! └──────────────┘              └────────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::display::ColorState;

pub struct Mailbox {
    slot: Signal<CriticalSectionRawMutex, ColorState>,
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Deliver a request, discarding any undelivered one.
    pub fn post(&self, state: ColorState) {
        self.slot.signal(state);
    }

    /// Take the pending request without waiting.
    pub fn try_take(&self) -> Option<ColorState> {
        self.slot.try_take()
    }

    /// Whether a request is waiting.
    pub fn is_pending(&self) -> bool {
        self.slot.signaled()
    }

    /// Wait for the next request.
    pub async fn receive(&self) -> ColorState {
        self.slot.wait().await
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}
