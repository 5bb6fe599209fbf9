//! Pooling events from several calendars into one ordered list.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, TimeDelta};
use log::debug;

use super::event::{CalendarEvent, CalendarSnapshot, EventTime, EventType};
use crate::error::{Error, Result};

/// How far ahead of "now" events are considered.
pub const LOOKAHEAD: TimeDelta = TimeDelta::hours(2);

/// The time span fetched and evaluated on each poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Window {
    /// `[now, now + LOOKAHEAD]`.
    pub fn lookahead(now: DateTime<FixedOffset>) -> Self {
        Self {
            start: now,
            end: now + LOOKAHEAD,
        }
    }
}

/// True when the calendar carries an out-of-office entry spanning the
/// whole window.
pub fn out_of_office(events: &[CalendarEvent], window: Window) -> bool {
    events
        .iter()
        .filter(|e| e.event_type == EventType::OutOfOffice)
        .any(|e| e.covers(window.start, window.end))
}

/// Calendars that are not out of office for this window.
pub fn in_office<'a>(
    snapshots: &'a [CalendarSnapshot],
    window: Window,
) -> impl Iterator<Item = &'a CalendarSnapshot> {
    snapshots.iter().filter(move |snapshot| {
        let away = out_of_office(&snapshot.events, window);
        if away {
            debug!("Skipping calendar {}: out of office", snapshot.calendar_id);
        }
        !away
    })
}

/// Merge the event lists of every polled calendar.
///
/// A single calendar's list is passed through in API order; the selector
/// skips its all-day and pseudo entries itself.  With several calendars,
/// events are de-duplicated by id (first occurrence wins), all-day and
/// pseudo entries are dropped, and the result is stably sorted by start.
pub fn merge<'a>(snapshots: &[&'a CalendarSnapshot]) -> Result<Vec<&'a CalendarEvent>> {
    if let [only] = snapshots {
        return Ok(only.events.iter().collect());
    }

    let mut seen = HashSet::new();
    let mut pooled = Vec::new();
    for event in snapshots.iter().flat_map(|s| s.events.iter()) {
        if event.is_all_day() || event.is_pseudo() {
            debug!("Skipping all-day or marker event '{}'", event.title);
            continue;
        }
        if !seen.insert(event.id.as_str()) {
            debug!("Skipping duplicate event with ID {}", event.id);
            continue;
        }
        pooled.push(event);
    }

    let mut keyed = pooled
        .into_iter()
        .map(|event| match &event.start {
            EventTime::At(start) => Ok((*start, event)),
            other => Err(Error::InternalConsistency(format!(
                "event {} reached ordering with start {:?}",
                event.id, other
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(start, _)| *start);
    Ok(keyed.into_iter().map(|(_, event)| event).collect())
}
