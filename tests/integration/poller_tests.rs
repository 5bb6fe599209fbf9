//! Poller: schedule, fetch failures and the hand-off to the mailbox.

use std::sync::Arc;
use std::time::Duration;

use calendar_indicator::adapters::clock::FixedClock;
use calendar_indicator::app::events::{IndicatorEvent, PollSkip};
use calendar_indicator::app::poller::{ActiveSchedule, MAX_SLEEP, Poller};
use calendar_indicator::config::IndicatorConfig;
use calendar_indicator::display::color::*;
use calendar_indicator::drivers::RunnerLink;
use chrono::TimeDelta;

use super::mock_hw::{MockCalendar, RecordingSink, at, meeting};

// 2024-05-06 is a Monday.
const MONDAY_MORNING: &str = "2024-05-06T09:00:00+02:00";

struct Harness {
    poller: Poller<MockCalendar, FixedClock, RecordingSink>,
    calendar: MockCalendar,
    clock: FixedClock,
    sink: RecordingSink,
    link: Arc<RunnerLink>,
}

fn harness(config: &IndicatorConfig) -> Harness {
    let calendar = MockCalendar::new();
    let clock = FixedClock::new(at(MONDAY_MORNING));
    let sink = RecordingSink::new();
    let link = Arc::new(RunnerLink::new());
    let poller = Poller::new(
        calendar.clone(),
        clock.clone(),
        sink.clone(),
        Arc::clone(&link),
        config.calendars.clone(),
        config.to_preferences().unwrap(),
        config.to_schedule().unwrap(),
        config.poll_interval(),
    );
    Harness {
        poller,
        calendar,
        clock,
        sink,
        link,
    }
}

#[test]
fn upcoming_meeting_is_posted() {
    let mut h = harness(&IndicatorConfig::default());
    h.calendar
        .set_events("primary", vec![meeting("sync", at(MONDAY_MORNING), 7)]);

    let outcome = h.poller.poll().unwrap();
    assert_eq!(outcome.posted, Some(RED));
    assert_eq!(outcome.sleep, Duration::from_secs(30));
    assert_eq!(h.link.mailbox.try_take(), Some(RED));

    let fetches = h.calendar.fetches();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].1.end - fetches[0].1.start, TimeDelta::hours(2));
}

#[test]
fn empty_calendar_posts_black() {
    let mut h = harness(&IndicatorConfig::default());
    assert_eq!(h.poller.poll().unwrap().posted, Some(BLACK));
}

#[test]
fn fetch_failures_escalate_to_magenta() {
    let mut h = harness(&IndicatorConfig::default());
    h.calendar.set_failing(true);

    for _ in 0..3 {
        assert_eq!(h.poller.poll().unwrap().posted, None);
    }
    assert!(!h.link.mailbox.is_pending());

    assert_eq!(h.poller.poll().unwrap().posted, Some(MAGENTA_FLASH));
    assert_eq!(
        h.sink
            .count(|e| matches!(e, IndicatorEvent::FetchFailed { .. })),
        4
    );

    h.calendar.set_failing(false);
    assert_eq!(h.poller.poll().unwrap().posted, Some(BLACK));
    assert_eq!(h.poller.health().consecutive_failures(), 0);
}

#[test]
fn outside_hours_posts_black_and_caps_sleep() {
    let config = IndicatorConfig::from_json_str(
        r#"{ "startTime": "10:00", "endTime": "17:00", "skipDays": ["Saturday"] }"#,
    )
    .unwrap();
    let mut h = harness(&config);
    h.calendar
        .set_events("primary", vec![meeting("sync", at(MONDAY_MORNING), 100)]);

    let outcome = h.poller.poll().unwrap();
    assert_eq!(outcome.posted, Some(BLACK));
    assert_eq!(outcome.sleep, MAX_SLEEP);
    assert!(h.calendar.fetches().is_empty());
    assert_eq!(
        h.sink.events().last(),
        Some(&IndicatorEvent::PollSkipped(PollSkip::BeforeStart))
    );

    h.clock.advance(TimeDelta::minutes(58));
    let outcome = h.poller.poll().unwrap();
    assert_eq!(outcome.sleep, Duration::from_secs(2 * 60));

    h.clock.advance(TimeDelta::minutes(2));
    assert_eq!(h.poller.poll().unwrap().posted, Some(GREEN));
}

#[test]
fn always_schedule_never_skips() {
    assert_eq!(ActiveSchedule::always().inactive(at("2024-05-05T03:00:00Z")), None);
}
