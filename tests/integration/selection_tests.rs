//! Selection and planning over events decoded from calendar-API JSON.

use calendar_indicator::calendar::{
    CalendarEvent, CalendarSnapshot, ResponseStatus, UserPreferences, WorkSite, select,
};
use calendar_indicator::display::color::*;
use calendar_indicator::display::{PrioritySide, state_for_events};
use calendar_indicator::error::Error;

use super::mock_hw::{at, meeting};

const NOW: &str = "2024-05-06T09:00:00+02:00";

fn decode(json: &str) -> Vec<CalendarEvent> {
    serde_json::from_str(json).unwrap()
}

fn ids(snapshots: &[CalendarSnapshot], prefs: &UserPreferences) -> Vec<String> {
    select(snapshots, at(NOW), prefs)
        .unwrap()
        .iter()
        .map(|e| e.id.clone())
        .collect()
}

#[test]
fn api_events_drive_single_event_display() {
    let events = decode(
        r#"[
            { "id": "standup", "summary": "Standup",
              "start": { "dateTime": "2024-05-06T09:03:00+02:00" },
              "end":   { "dateTime": "2024-05-06T09:15:00+02:00" },
              "selfResponse": "accepted" },
            { "id": "holiday", "summary": "Bank holiday",
              "start": { "date": "2024-05-06" },
              "end":   { "date": "2024-05-07" } }
        ]"#,
    );
    let snapshots = [CalendarSnapshot::new("primary", events)];
    let prefs = UserPreferences::default();
    let selection = select(&snapshots, at(NOW), &prefs).unwrap();
    assert_eq!(selection.len(), 1);
    let state = state_for_events(&selection, at(NOW), PrioritySide::None).unwrap();
    assert_eq!(state, RED_FLASH);
}

#[test]
fn office_override_opens_location_gate() {
    let events = decode(
        r#"[
            { "id": "loc-home", "summary": "Home", "eventType": "workingLocation",
              "created": "2024-05-01T10:00:00+02:00",
              "start": { "date": "2024-05-06" }, "end": { "date": "2024-05-07" },
              "workingLocation": "home" },
            { "id": "loc-office", "summary": "Office", "eventType": "workingLocation",
              "created": "2024-05-05T10:00:00+02:00",
              "start": { "dateTime": "2024-05-06T08:00:00+02:00" },
              "end":   { "dateTime": "2024-05-06T12:00:00+02:00" },
              "workingLocation": "office:HQ" },
            { "id": "review", "summary": "Design review",
              "start": { "dateTime": "2024-05-06T09:20:00+02:00" },
              "end":   { "dateTime": "2024-05-06T10:00:00+02:00" } }
        ]"#,
    );
    let snapshots = [CalendarSnapshot::new("primary", events)];
    let office_only = UserPreferences {
        working_locations: vec![WorkSite::parse("office:")],
        ..UserPreferences::default()
    };
    assert_eq!(ids(&snapshots, &office_only), ["review"]);

    let home_only = UserPreferences {
        working_locations: vec![WorkSite::home()],
        ..UserPreferences::default()
    };
    assert!(ids(&snapshots, &home_only).is_empty());
}

#[test]
fn calendars_merge_by_start_without_duplicates() {
    let now = at(NOW);
    let shared = meeting("shared", now, 12);
    let snapshots = [
        CalendarSnapshot::new("me", vec![meeting("late", now, 40), shared.clone()]),
        CalendarSnapshot::new("team", vec![shared, meeting("early", now, 4)]),
    ];
    let prefs = UserPreferences {
        multi_event: true,
        ..UserPreferences::default()
    };
    assert_eq!(ids(&snapshots, &prefs), ["early", "shared"]);
}

#[test]
fn pair_is_combined_and_priority_swaps() {
    let now = at(NOW);
    let mut soon = meeting("soon", now, 20);
    let mut imminent = meeting("imminent", now, 3);
    soon.self_response = Some(ResponseStatus::Accepted);
    imminent.self_response = None;
    let snapshots = [CalendarSnapshot::new("primary", vec![soon, imminent])];
    let prefs = UserPreferences {
        multi_event: true,
        priority_flash_side: PrioritySide::Side1,
        ..UserPreferences::default()
    };
    let selection = select(&snapshots, now, &prefs).unwrap();
    let state = state_for_events(&selection, now, prefs.priority_flash_side).unwrap();
    // Yellow on side 1, red flash on side 2, then moved to side 1.
    assert_eq!(state.primary(), COLOR_RED);
    assert!(!state.primary_flash().is_zero());
    assert_eq!(state.secondary(), COLOR_YELLOW);
    assert!(state.secondary_flash().is_zero());
}

#[test]
fn unparsed_start_across_calendars_is_fatal() {
    let broken = decode(
        r#"[{ "id": "x", "start": { "dateTime": "not a time" }, "end": { "dateTime": "also not" } }]"#,
    );
    let snapshots = [
        CalendarSnapshot::new("a", broken),
        CalendarSnapshot::new("b", vec![meeting("ok", at(NOW), 5)]),
    ];
    let err = select(&snapshots, at(NOW), &UserPreferences::default()).unwrap_err();
    assert!(matches!(err, Error::InternalConsistency(_)));
    assert!(err.is_fatal());
}
