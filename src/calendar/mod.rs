//! Calendar data model and event selection.  Pure logic, no I/O.
//!
//! Upstream fetchers hand over one [`CalendarSnapshot`] per polled
//! calendar.  [`selector::select`] reduces them to the events that should
//! drive the display.

pub mod event;
pub mod merge;
pub mod prefs;
pub mod selector;
pub mod worksite;

pub use event::{CalendarEvent, CalendarSnapshot, EventTime, EventType, ResponseStatus};
pub use prefs::{ResponseState, UserPreferences};
pub use selector::{Selection, select};
pub use worksite::{WorkSite, WorkSiteType};
