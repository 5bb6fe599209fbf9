//! Poll policy: one calendar poll per call.
//!
//! ```text
//!  Clock ──▶ ActiveSchedule ──(outside hours)──▶ BLACK, sleep until active
//!                 │
//!                 ▼
//!  CalendarSource ──▶ FetchHealth ──(> 3 failures)──▶ MAGENTA_FLASH
//!                 │
//!                 ▼
//!  select ──▶ state_for_events ──▶ Mailbox
//! ```
//!
//! The poller never sleeps itself; it returns how long the caller should
//! wait before the next poll.  Every proposed sleep is capped at
//! [`MAX_SLEEP`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, TimeDelta, TimeZone, Weekday};
use log::{info, warn};

use super::events::{IndicatorEvent, PollSkip};
use super::ports::{CalendarSource, Clock, EventSink};
use crate::calendar::merge::Window;
use crate::calendar::{CalendarSnapshot, UserPreferences, select};
use crate::display::color::{BLACK, MAGENTA_FLASH};
use crate::display::{ColorState, state_for_events};
use crate::drivers::pattern::RunnerLink;
use crate::error::Result;

/// Upper bound on any sleep the poller proposes.
pub const MAX_SLEEP: Duration = Duration::from_secs(5 * 60);

/// Consecutive fetch failures tolerated before the light reports them.
pub const FETCH_FAILURE_LIMIT: u32 = 3;

// ── Schedule ──────────────────────────────────────────────────

/// When the indicator is allowed to show anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSchedule {
    skip_days: Vec<Weekday>,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
}

impl ActiveSchedule {
    pub fn new(skip_days: Vec<Weekday>, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        Self {
            skip_days,
            start,
            end,
        }
    }

    /// Active every day, all day.
    pub fn always() -> Self {
        Self::default()
    }

    /// `None` while active; otherwise why not and how long until it might be.
    pub fn inactive(&self, now: DateTime<FixedOffset>) -> Option<(PollSkip, Duration)> {
        let time = now.time();
        if self.skip_days.contains(&now.weekday()) {
            return Some((PollSkip::SkipDay, until_midnight(now)));
        }
        if let Some(start) = self.start.filter(|&start| time < start) {
            let wait = (start - time).to_std().unwrap_or(Duration::ZERO);
            return Some((PollSkip::BeforeStart, wait));
        }
        if self.end.is_some_and(|end| time > end) {
            return Some((PollSkip::AfterEnd, until_midnight(now)));
        }
        None
    }
}

/// Time left until tomorrow's midnight in `now`'s offset.
fn until_midnight(now: DateTime<FixedOffset>) -> Duration {
    let tomorrow = now.date_naive() + TimeDelta::days(1);
    now.offset()
        .from_local_datetime(&tomorrow.and_time(NaiveTime::MIN))
        .single()
        .and_then(|midnight| (midnight - now).to_std().ok())
        .unwrap_or(MAX_SLEEP)
}

// ── Fetch health ──────────────────────────────────────────────

/// Counts consecutive failed polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchHealth {
    consecutive: u32,
}

impl FetchHealth {
    /// Record a failure, returning the new count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive = self.consecutive.saturating_add(1);
        self.consecutive
    }

    pub fn record_success(&mut self) {
        if self.consecutive > 0 {
            info!("Calendar fetch recovered after {} failure(s)", self.consecutive);
        }
        self.consecutive = 0;
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive
    }

    /// Past the tolerated number of failures.
    pub fn is_degraded(&self) -> bool {
        self.consecutive > FETCH_FAILURE_LIMIT
    }
}

// ── Poller ────────────────────────────────────────────────────

/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// State posted to the runner, if any.
    pub posted: Option<ColorState>,
    /// How long to wait before polling again.
    pub sleep: Duration,
}

pub struct Poller<C: CalendarSource, K: Clock, S: EventSink> {
    source: C,
    clock: K,
    sink: S,
    link: Arc<RunnerLink>,
    calendars: Vec<String>,
    prefs: UserPreferences,
    schedule: ActiveSchedule,
    interval: Duration,
    health: FetchHealth,
}

impl<C: CalendarSource, K: Clock, S: EventSink> Poller<C, K, S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: C,
        clock: K,
        sink: S,
        link: Arc<RunnerLink>,
        calendars: Vec<String>,
        prefs: UserPreferences,
        schedule: ActiveSchedule,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            sink,
            link,
            calendars,
            prefs,
            schedule,
            interval,
            health: FetchHealth::default(),
        }
    }

    pub fn health(&self) -> FetchHealth {
        self.health
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one poll and post the resulting state.  Only fatal errors are
    /// returned; fetch failures are counted and absorbed.
    pub fn poll(&mut self) -> Result<PollOutcome> {
        let now = self.clock.now();
        if let Some((reason, wait)) = self.schedule.inactive(now) {
            self.sink.emit(&IndicatorEvent::PollSkipped(reason));
            return Ok(self.post(Some(BLACK), wait));
        }

        let Some(snapshots) = self.fetch_all(Window::lookahead(now)) else {
            let posted = self.health.is_degraded().then_some(MAGENTA_FLASH);
            return Ok(self.post(posted, self.interval));
        };
        self.health.record_success();

        let selection = select(&snapshots, now, &self.prefs)?;
        let state = state_for_events(&selection, now, self.prefs.priority_flash_side)?;
        self.sink.emit(&IndicatorEvent::Planned {
            events: selection.len(),
            state: state.name().to_owned(),
        });
        Ok(self.post(Some(state), self.interval))
    }

    /// Fetch every calendar; `None` if any fetch failed.
    fn fetch_all(&mut self, window: Window) -> Option<Vec<CalendarSnapshot>> {
        let mut snapshots = Vec::with_capacity(self.calendars.len());
        for id in &self.calendars {
            match self.source.fetch(id, window) {
                Ok(events) => snapshots.push(CalendarSnapshot::new(id.as_str(), events)),
                Err(e) => {
                    let consecutive = self.health.record_failure();
                    warn!("Fetching calendar {} failed: {:#}", id, e);
                    self.sink.emit(&IndicatorEvent::FetchFailed {
                        consecutive,
                        reason: format!("{e:#}"),
                    });
                    return None;
                }
            }
        }
        Some(snapshots)
    }

    fn post(&self, state: Option<ColorState>, sleep: Duration) -> PollOutcome {
        if let Some(state) = &state {
            self.link.mailbox.post(state.clone());
        }
        PollOutcome {
            posted: state,
            sleep: sleep.min(MAX_SLEEP),
        }
    }
}
