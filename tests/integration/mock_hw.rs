//! Mock adapters for integration tests.
//!
//! A scriptable calendar source and a recording event sink.  The light
//! itself comes from `calendar_indicator::adapters::sim`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use calendar_indicator::app::events::IndicatorEvent;
use calendar_indicator::app::ports::{CalendarSource, EventSink};
use calendar_indicator::calendar::merge::Window;
use calendar_indicator::calendar::{CalendarEvent, EventTime, EventType, ResponseStatus};
use chrono::{DateTime, FixedOffset, TimeDelta};

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// A 30-minute meeting starting `minutes` after `now`.
pub fn meeting(id: &str, now: DateTime<FixedOffset>, minutes: i64) -> CalendarEvent {
    let start = now + TimeDelta::minutes(minutes);
    CalendarEvent {
        id: id.into(),
        title: id.into(),
        start: EventTime::At(start),
        end: EventTime::At(start + TimeDelta::minutes(30)),
        created: None,
        event_type: EventType::Default,
        self_response: Some(ResponseStatus::Accepted),
        working_location: None,
    }
}

// ── MockCalendar ──────────────────────────────────────────────

#[derive(Default)]
struct CalendarState {
    events: HashMap<String, Vec<CalendarEvent>>,
    failing: bool,
    fetches: Vec<(String, Window)>,
}

/// Serves canned events per calendar id.  Clones share state.
#[derive(Clone, Default)]
pub struct MockCalendar {
    state: Arc<Mutex<CalendarState>>,
}

#[allow(dead_code)]
impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_events(&self, calendar_id: &str, events: Vec<CalendarEvent>) {
        self.state
            .lock()
            .unwrap()
            .events
            .insert(calendar_id.to_owned(), events);
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn fetches(&self) -> Vec<(String, Window)> {
        self.state.lock().unwrap().fetches.clone()
    }
}

impl CalendarSource for MockCalendar {
    fn fetch(&mut self, calendar_id: &str, window: Window) -> anyhow::Result<Vec<CalendarEvent>> {
        let mut state = self.state.lock().unwrap();
        state.fetches.push((calendar_id.to_owned(), window));
        if state.failing {
            anyhow::bail!("upstream unavailable");
        }
        Ok(state.events.get(calendar_id).cloned().unwrap_or_default())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Keeps every emitted event.  Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<IndicatorEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<IndicatorEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&IndicatorEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &IndicatorEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
