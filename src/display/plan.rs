//! Turning selected events into one display decision.

use chrono::{DateTime, FixedOffset};
use log::debug;

use super::algebra::{PrioritySide, apply_priority, combine};
use super::color::{BLACK, ColorState};
use super::mapper::state_for_delta;
use crate::calendar::CalendarEvent;
use crate::error::{Error, Result};

/// Minutes from `now` until `start`, negative once the event has begun.
pub fn minutes_until(start: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> f64 {
    (start - now).num_milliseconds() as f64 / 60_000.0
}

/// Display state for up to two selected events.
///
/// The first event is shown alone; a second one takes side 2 unless it maps
/// to off.  The priority side only comes into play when a pair is combined.
pub fn state_for_events(
    events: &[&CalendarEvent],
    now: DateTime<FixedOffset>,
    priority: PrioritySide,
) -> Result<ColorState> {
    let mut state = BLACK;
    for (index, event) in events.iter().enumerate() {
        let start = event.start_time().ok_or_else(|| {
            Error::InternalConsistency(format!(
                "selected event {} has no parsed start time",
                event.id
            ))
        })?;
        let delta = minutes_until(start, now);
        let mapped = state_for_delta(delta);
        state = if index == 0 {
            mapped
        } else if mapped == BLACK {
            state
        } else {
            apply_priority(combine(&state, &mapped), priority)
        };
        debug!(
            "Event '{}', start {}, delta {:.1}, state {}",
            event.title, start, delta, state
        );
    }
    Ok(state)
}
