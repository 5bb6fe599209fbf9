//! Outbound diagnostic events.
//!
//! The pattern runner and the poller emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use std::time::Duration;

use crate::display::Rgb;
use crate::error::Error;

/// Why a poll did not look at the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollSkip {
    /// Today is configured as a skip day.
    SkipDay,
    /// Before the configured daily start time.
    BeforeStart,
    /// After the configured daily end time.
    AfterEnd,
}

/// Structured events emitted by the domain core.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorEvent {
    /// The pattern runner made its first write.
    Started { failing: bool },

    /// A new display state was adopted.
    StateChanged { from: String, to: String },

    /// A request equal to the current state was ignored.
    StateRetained(String),

    /// A solid state replaced a flashing one.
    TimerCancelled,

    /// The flash timer fired and both sides were written.
    TimerFired {
        side1: Rgb,
        side2: Rgb,
        next: Duration,
    },

    /// A write failed after its retry.
    WriteFailed(Error),

    /// A poll was skipped by the active schedule.
    PollSkipped(PollSkip),

    /// Fetching a calendar failed.
    FetchFailed { consecutive: u32, reason: String },

    /// Events were selected and a state planned.
    Planned { events: usize, state: String },

    /// Shutdown began.
    ShutdownRequested,

    /// Debug verbosity was switched on.
    DebugEnabled,
}

impl IndicatorEvent {
    /// Routine chatter that only matters when debugging.
    pub fn is_verbose(&self) -> bool {
        matches!(
            self,
            Self::StateRetained(_)
                | Self::TimerFired { .. }
                | Self::TimerCancelled
                | Self::Planned { .. }
                | Self::PollSkipped(_)
        )
    }
}
