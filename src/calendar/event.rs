//! Calendar records as supplied by the upstream fetcher.
//!
//! Events are read-only here.  Times arrive in the calendar API's shape
//! (`{"dateTime": ...}` for timed events, `{"date": ...}` for all-day
//! ones) and are parsed once on deserialization; text that is not RFC 3339
//! is kept as [`EventTime::Unparsed`] so the merge step can reject it.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::worksite::WorkSite;

/// Start or end of an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEventTime")]
pub enum EventTime {
    /// A timed boundary.
    At(DateTime<FixedOffset>),
    /// A whole-day boundary (the event has no time of day).
    AllDay(NaiveDate),
    /// A timestamp that failed to parse, or was absent.
    Unparsed(String),
}

impl EventTime {
    pub fn at(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::At(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventTime {
    #[serde(default)]
    date_time: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl From<RawEventTime> for EventTime {
    fn from(raw: RawEventTime) -> Self {
        match (raw.date_time, raw.date) {
            (Some(text), _) if !text.is_empty() => DateTime::parse_from_rfc3339(&text)
                .map_or(Self::Unparsed(text), Self::At),
            (_, Some(text)) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map_or(Self::Unparsed(text), Self::AllDay),
            _ => Self::Unparsed(String::new()),
        }
    }
}

/// Calendar API event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    #[default]
    Default,
    FocusTime,
    OutOfOffice,
    WorkingLocation,
}

/// The authenticated user's own attendance response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default, alias = "summary")]
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub created: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub event_type: EventType,
    /// `None` when the user has no attendee record on the event.
    #[serde(default)]
    pub self_response: Option<ResponseStatus>,
    #[serde(default)]
    pub working_location: Option<WorkSite>,
}

impl CalendarEvent {
    /// Parsed start time, if the event is timed.
    pub fn start_time(&self) -> Option<DateTime<FixedOffset>> {
        self.start.at()
    }

    pub fn end_time(&self) -> Option<DateTime<FixedOffset>> {
        self.end.at()
    }

    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// Working-location and out-of-office entries are markers, not meetings.
    pub fn is_pseudo(&self) -> bool {
        matches!(
            self.event_type,
            EventType::WorkingLocation | EventType::OutOfOffice
        )
    }

    /// Whether the event spans `[from, until]` entirely.
    ///
    /// All-day events cover every instant of their dates; the end date is
    /// exclusive, as the calendar API reports it.
    pub fn covers(&self, from: DateTime<FixedOffset>, until: DateTime<FixedOffset>) -> bool {
        match (&self.start, &self.end) {
            (EventTime::At(start), EventTime::At(end)) => *start <= from && *end >= until,
            (EventTime::AllDay(start), EventTime::AllDay(end)) => {
                *start <= from.date_naive() && *end > until.date_naive()
            }
            _ => false,
        }
    }
}

/// Events fetched from one calendar for the current window.
#[derive(Debug, Clone, Default)]
pub struct CalendarSnapshot {
    pub calendar_id: String,
    pub events: Vec<CalendarEvent>,
}

impl CalendarSnapshot {
    pub fn new(calendar_id: impl Into<String>, events: Vec<CalendarEvent>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            events,
        }
    }
}
