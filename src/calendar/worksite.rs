//! Working locations.
//!
//! Each calendar may publish "working location" pseudo-events: a recurring
//! all-day entry (the default for the day) plus occasional timed overrides.
//! The calendar API keeps returning an overridden recurring entry, so the
//! most recently *created* entry of each kind is the one that counts.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset};
use log::debug;
use serde::{Deserialize, Serialize};

use super::event::{CalendarEvent, CalendarSnapshot, EventType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkSiteType {
    #[default]
    Home,
    Office,
    Custom,
}

impl WorkSiteType {
    /// Unknown names fall back to `Home`.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "office" | "officelocation" => Self::Office,
            "custom" | "customlocation" => Self::Custom,
            _ => Self::Home,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Office => "office",
            Self::Custom => "custom",
        }
    }
}

/// A working location.  The name is meaningless for `Home`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WorkSite {
    pub site_type: WorkSiteType,
    pub name: String,
}

impl WorkSite {
    pub fn home() -> Self {
        Self::default()
    }

    pub fn new(site_type: WorkSiteType, name: impl Into<String>) -> Self {
        Self {
            site_type,
            name: name.into(),
        }
    }

    /// Parse `"type:name"`, e.g. `"office:Building 4"` or `"home"`.
    pub fn parse(text: &str) -> Self {
        let (kind, name) = text.split_once(':').unwrap_or((text, ""));
        Self::new(WorkSiteType::parse(kind), name)
    }

    /// Filter semantics: an empty name on `self` matches every site of the
    /// same type.
    pub fn matches(&self, site: &WorkSite) -> bool {
        self.site_type == site.site_type
            && (self.site_type == WorkSiteType::Home
                || self.name.is_empty()
                || self.name == site.name)
    }
}

impl PartialEq for WorkSite {
    fn eq(&self, other: &Self) -> bool {
        self.site_type == other.site_type
            && (self.site_type == WorkSiteType::Home || self.name == other.name)
    }
}

impl Eq for WorkSite {}

impl Hash for WorkSite {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.site_type.hash(state);
        if self.site_type != WorkSiteType::Home {
            self.name.hash(state);
        }
    }
}

impl fmt::Display for WorkSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.site_type {
            WorkSiteType::Home => f.write_str("home"),
            other => write!(f, "{}:{}", other.as_str(), self.name),
        }
    }
}

impl From<String> for WorkSite {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<WorkSite> for String {
    fn from(site: WorkSite) -> Self {
        site.to_string()
    }
}

// ── Active site derivation ────────────────────────────────────

/// Latest-created entry wins; entries without a creation time are skipped.
fn newest<'a>(
    events: impl Iterator<Item = &'a CalendarEvent>,
) -> Option<(&'a CalendarEvent, DateTime<FixedOffset>)> {
    events
        .filter_map(|e| e.created.map(|created| (e, created)))
        .fold(None, |best, (event, created)| match best {
            Some((_, best_created)) if created < best_created => best,
            _ => Some((event, created)),
        })
}

/// The site a single calendar reports for `now`, if any.
///
/// The newest all-day entry is the base for the day; a timed override that
/// has not yet ended replaces it, newest override first.
pub fn active_site(events: &[CalendarEvent], now: DateTime<FixedOffset>) -> Option<WorkSite> {
    let locations = || {
        events
            .iter()
            .filter(|e| e.event_type == EventType::WorkingLocation)
    };
    let base = newest(locations().filter(|e| e.is_all_day()));
    let overriding = newest(
        locations()
            .filter(|e| !e.is_all_day())
            .filter(|e| e.end_time().is_none_or(|end| end > now)),
    );

    let (event, _) = overriding.or(base)?;
    let site = event.working_location.clone().unwrap_or_default();
    debug!("Location detected: event '{}' -> {}", event.title, site);
    Some(site)
}

/// Active sites across every polled calendar, one per calendar at most.
pub fn active_sites(snapshots: &[CalendarSnapshot], now: DateTime<FixedOffset>) -> Vec<WorkSite> {
    snapshots
        .iter()
        .filter_map(|snapshot| active_site(&snapshot.events, now))
        .collect()
}

/// True when no filter is configured, or some active site matches a filter.
pub fn location_allows(filters: &[WorkSite], active: &[WorkSite]) -> bool {
    if filters.is_empty() {
        return true;
    }
    match filters
        .iter()
        .find(|filter| active.iter().any(|site| filter.matches(site)))
    {
        Some(filter) => {
            debug!("Found matching location: {}", filter);
            true
        }
        None => {
            debug!("No matching location in {:?}", active);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::EventTime;
    use chrono::NaiveDate;

    fn ts(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    fn location(id: &str, site: WorkSite, all_day: bool, created: &str) -> CalendarEvent {
        let (start, end) = if all_day {
            let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
            (EventTime::AllDay(day), EventTime::AllDay(day.succ_opt().unwrap()))
        } else {
            (
                EventTime::At(ts("2024-05-06T08:00:00Z")),
                EventTime::At(ts("2024-05-06T12:00:00Z")),
            )
        };
        CalendarEvent {
            id: id.into(),
            title: site.to_string(),
            start,
            end,
            created: Some(ts(created)),
            event_type: EventType::WorkingLocation,
            self_response: None,
            working_location: Some(site),
        }
    }

    #[test]
    fn parse_site_strings() {
        assert_eq!(WorkSite::parse("home"), WorkSite::home());
        assert_eq!(
            WorkSite::parse("officeLocation:B4"),
            WorkSite::new(WorkSiteType::Office, "B4")
        );
        assert_eq!(WorkSite::parse("custom:Cafe").site_type, WorkSiteType::Custom);
        assert_eq!(WorkSite::parse("moon:base").site_type, WorkSiteType::Home);
    }

    #[test]
    fn home_ignores_name_for_equality() {
        assert_eq!(
            WorkSite::new(WorkSiteType::Home, "a"),
            WorkSite::new(WorkSiteType::Home, "b")
        );
        assert_ne!(
            WorkSite::new(WorkSiteType::Office, "a"),
            WorkSite::new(WorkSiteType::Office, "b")
        );
    }

    #[test]
    fn empty_filter_name_matches_any_site_of_type() {
        let filter = WorkSite::parse("office:");
        assert!(filter.matches(&WorkSite::new(WorkSiteType::Office, "B4")));
        assert!(!filter.matches(&WorkSite::home()));
        assert!(!WorkSite::parse("office:B5").matches(&WorkSite::new(WorkSiteType::Office, "B4")));
    }

    #[test]
    fn newest_all_day_entry_is_the_base() {
        let events = vec![
            location("1", WorkSite::home(), true, "2024-05-01T00:00:00Z"),
            location("2", WorkSite::parse("office:B4"), true, "2024-05-03T00:00:00Z"),
        ];
        let site = active_site(&events, ts("2024-05-06T09:00:00Z"));
        assert_eq!(site, Some(WorkSite::parse("office:B4")));
    }

    #[test]
    fn timed_override_beats_newer_all_day_base() {
        let events = vec![
            location("1", WorkSite::parse("office:B4"), false, "2024-05-01T00:00:00Z"),
            location("2", WorkSite::home(), true, "2024-05-03T00:00:00Z"),
        ];
        let site = active_site(&events, ts("2024-05-06T09:00:00Z"));
        assert_eq!(site, Some(WorkSite::parse("office:B4")));
    }

    #[test]
    fn ended_override_falls_back_to_base() {
        let events = vec![
            location("1", WorkSite::parse("office:B4"), false, "2024-05-05T00:00:00Z"),
            location("2", WorkSite::home(), true, "2024-05-01T00:00:00Z"),
        ];
        let site = active_site(&events, ts("2024-05-06T13:00:00Z"));
        assert_eq!(site, Some(WorkSite::home()));
    }

    #[test]
    fn no_location_events_yields_none() {
        assert_eq!(active_site(&[], ts("2024-05-06T09:00:00Z")), None);
    }

    #[test]
    fn gate_passes_without_filters() {
        assert!(location_allows(&[], &[]));
        assert!(!location_allows(&[WorkSite::home()], &[]));
    }
}
