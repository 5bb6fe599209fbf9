//! Choosing the 0–2 events worth showing.
//!
//! ```text
//!  snapshots ──▶ out-of-office gate ──▶ merge ──┐
//!      │                                        ▼
//!      └──▶ active work sites ──▶ location gate ──▶ admission ──▶ Selection
//! ```

use chrono::{DateTime, FixedOffset};
use log::debug;

use super::event::{CalendarEvent, CalendarSnapshot};
use super::merge::{Window, in_office, merge};
use super::prefs::UserPreferences;
use super::worksite::{WorkSite, active_sites, location_allows};
use crate::error::Result;

/// At most two events, in display order.
pub type Selection<'a> = heapless::Vec<&'a CalendarEvent, 2>;

/// Filter an ordered event list down to what should be displayed.
///
/// `sites` are the working locations active right now; when the
/// preferences name any, at least one must match or nothing is shown.
pub fn next_events<'a>(
    events: &[&'a CalendarEvent],
    sites: &[WorkSite],
    prefs: &UserPreferences,
) -> Selection<'a> {
    let mut selected = Selection::new();
    if !location_allows(&prefs.working_locations, sites) {
        debug!("Skipping all events: no matching location in {:?}", sites);
        return selected;
    }

    let limit = prefs.event_limit();
    for &event in events {
        if event.is_all_day() || event.is_pseudo() {
            continue;
        }
        if prefs.excludes_title(&event.title) {
            debug!("Skipping excluded event '{}'", event.title);
            continue;
        }
        if !prefs.admits_response(event.self_response) {
            debug!(
                "Skipping event '{}' with response {:?}",
                event.title, event.self_response
            );
            continue;
        }
        if selected.push(event).is_err() || selected.len() >= limit {
            break;
        }
    }
    debug!("next_events returning {} events", selected.len());
    selected
}

/// Run the full selection pipeline for one poll.
pub fn select<'a>(
    snapshots: &'a [CalendarSnapshot],
    now: DateTime<FixedOffset>,
    prefs: &UserPreferences,
) -> Result<Selection<'a>> {
    let window = Window::lookahead(now);
    let sites = if prefs.working_locations.is_empty() {
        Vec::new()
    } else {
        active_sites(snapshots, now)
    };
    let present: Vec<&CalendarSnapshot> = in_office(snapshots, window).collect();
    let merged = merge(&present)?;
    Ok(next_events(&merged, &sites, prefs))
}
