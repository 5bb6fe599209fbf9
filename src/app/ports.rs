//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ controller / runner / poller (domain)
//! ```
//!
//! Driven adapters (the light, the calendar fetcher, the clock, event
//! sinks) implement these traits.  The domain consumes them via generics
//! or boxed trait objects, so it never touches hardware or the network
//! directly.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::calendar::CalendarEvent;
use crate::calendar::merge::Window;
use crate::display::Rgb;
use crate::error::DeviceError;

// ───────────────────────────────────────────────────────────────
// Light ports (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Which LED a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    /// Every LED at once.
    All,
    Side1,
    Side2,
}

/// One colour change for one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedCommand {
    pub led: Led,
    pub color: Rgb,
    /// Fade time; zero switches instantly.
    pub fade: Duration,
}

impl LedCommand {
    pub const fn new(led: Led, color: Rgb, fade: Duration) -> Self {
        Self { led, color, fade }
    }

    /// Every LED off, instantly.
    pub const fn all_off() -> Self {
        Self::new(Led::All, Rgb::OFF, Duration::ZERO)
    }
}

/// An open handle to the physical light.
///
/// Dropping the handle releases it.
pub trait LightDevice: Send {
    fn write(&mut self, command: &LedCommand) -> Result<(), DeviceError>;
}

/// Opens the next available light.
pub trait DeviceOpener: Send {
    fn open_next(&mut self) -> Result<Box<dyn LightDevice>, DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Calendar port (driven adapter: network → domain)
// ───────────────────────────────────────────────────────────────

/// Fetches the events of one calendar for a window.
///
/// Failures are opaque to the domain; the poller only counts them.
pub trait CalendarSource {
    fn fetch(&mut self, calendar_id: &str, window: Window) -> anyhow::Result<Vec<CalendarEvent>>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock time in the user's local offset.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`IndicatorEvent`](super::events::IndicatorEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink: Send {
    fn emit(&mut self, event: &super::events::IndicatorEvent);
}
