//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing indicator events through the `log`
//! facade.  Routine chatter (ticks, retained states, plans, skipped polls)
//! is only written while the [`DebugSwitch`] is on; transitions and
//! failures always are.

use log::{debug, info, warn};

use crate::app::events::{IndicatorEvent, PollSkip};
use crate::app::ports::EventSink;
use crate::diagnostics::DebugSwitch;

pub struct LogEventSink {
    debug: DebugSwitch,
}

impl LogEventSink {
    pub fn new(debug: DebugSwitch) -> Self {
        Self { debug }
    }

    /// Whether `event` would be written right now.
    pub fn admits(&self, event: &IndicatorEvent) -> bool {
        !event.is_verbose() || self.debug.is_enabled()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &IndicatorEvent) {
        if !self.admits(event) {
            return;
        }
        match event {
            IndicatorEvent::Started { failing } => {
                info!("START | failing={}", failing);
            }
            IndicatorEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            IndicatorEvent::StateRetained(name) => {
                debug!("STATE | retaining {}", name);
            }
            IndicatorEvent::TimerCancelled => {
                debug!("TIMER | cancelled");
            }
            IndicatorEvent::TimerFired { side1, side2, next } => {
                debug!("TIMER | side1={} side2={} next={:?}", side1, side2, next);
            }
            IndicatorEvent::WriteFailed(e) => {
                warn!("WRITE | failed: {}", e);
            }
            IndicatorEvent::PollSkipped(reason) => {
                let reason = match reason {
                    PollSkip::SkipDay => "skip day",
                    PollSkip::BeforeStart => "before start time",
                    PollSkip::AfterEnd => "after end time",
                };
                debug!("POLL | skipped, {}", reason);
            }
            IndicatorEvent::FetchFailed {
                consecutive,
                reason,
            } => {
                warn!("FETCH | failure #{}: {}", consecutive, reason);
            }
            IndicatorEvent::Planned { events, state } => {
                debug!("PLAN | {} event(s) -> {}", events, state);
            }
            IndicatorEvent::ShutdownRequested => {
                info!("SHUTDOWN | requested");
            }
            IndicatorEvent::DebugEnabled => {
                info!("DEBUG | enabled");
            }
        }
    }
}
