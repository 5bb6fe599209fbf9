//! Pattern runner against the simulated light, through the async loop.

use std::sync::Arc;
use std::time::Duration;

use calendar_indicator::adapters::sim::SimulatedLight;
use calendar_indicator::app::events::IndicatorEvent;
use calendar_indicator::app::ports::{Led, LedCommand};
use calendar_indicator::diagnostics::DebugSwitch;
use calendar_indicator::display::Rgb;
use calendar_indicator::display::color::*;
use calendar_indicator::drivers::pattern::spawn;
use calendar_indicator::drivers::{
    DeviceController, PatternRunner, RunnerLink, ShutdownHandler, ShutdownOutcome, SignalKind,
};
use calendar_indicator::error::Error;

use super::mock_hw::RecordingSink;

fn start(sim: &SimulatedLight, ceiling: u32) -> (PatternRunner<RecordingSink>, RecordingSink) {
    let sink = RecordingSink::new();
    let controller = DeviceController::new(Box::new(sim.opener()), ceiling).unwrap();
    (PatternRunner::new(controller, sink.clone()).unwrap(), sink)
}

fn settle() {
    std::thread::sleep(Duration::from_millis(150));
}

#[test]
fn flashing_state_alternates_on_the_light() {
    let sim = SimulatedLight::new();
    let (runner, _sink) = start(&sim, 3);
    let link = Arc::new(RunnerLink::new());
    let handle = spawn(runner, Arc::clone(&link)).unwrap();

    link.mailbox.post(FAST_RED_FLASH);
    std::thread::sleep(Duration::from_millis(400));
    link.request_stop();
    handle.join().unwrap().unwrap();

    let side1: Vec<Rgb> = sim
        .writes()
        .iter()
        .filter(|c| c.led == Led::Side1)
        .map(|c| c.color)
        .collect();
    // Startup black, then at least two red/off phases.
    assert!(side1.iter().filter(|c| **c == COLOR_RED).count() >= 1);
    assert!(side1.iter().skip(1).any(|c| c.is_off()));
}

#[test]
fn identical_requests_do_not_stall_flashing() {
    let sim = SimulatedLight::new();
    let (runner, _sink) = start(&sim, 3);
    let link = Arc::new(RunnerLink::new());
    let handle = spawn(runner, Arc::clone(&link)).unwrap();

    // Re-post faster than the 125 ms period for about 800 ms.
    for _ in 0..16 {
        link.mailbox.post(FAST_RED_FLASH);
        std::thread::sleep(Duration::from_millis(50));
    }
    link.request_stop();
    handle.join().unwrap().unwrap();

    let ticks: Vec<Rgb> = sim
        .writes()
        .iter()
        .skip(2)
        .filter(|c| c.led == Led::Side1)
        .map(|c| c.color)
        .collect();
    assert!(ticks.len() >= 3, "only {} ticks", ticks.len());
    assert!(ticks.contains(&COLOR_RED));
    assert!(ticks.iter().any(|c| c.is_off()));
}

#[test]
fn later_request_replaces_flashing() {
    let sim = SimulatedLight::new();
    let (runner, sink) = start(&sim, 3);
    let link = Arc::new(RunnerLink::new());
    let handle = spawn(runner, Arc::clone(&link)).unwrap();

    link.mailbox.post(RED_FLASH);
    settle();
    link.mailbox.post(GREEN);
    settle();
    let writes_after_green = sim.writes().len();
    settle();
    // Solid: nothing more is written once the timer is cancelled.
    assert_eq!(sim.writes().len(), writes_after_green);
    assert_eq!(sim.side_colors(), (COLOR_GREEN, COLOR_GREEN));

    link.request_stop();
    handle.join().unwrap().unwrap();
    assert!(sink.count(|e| *e == IndicatorEvent::TimerCancelled) >= 1);
}

#[test]
fn unreachable_device_ends_the_loop() {
    let sim = SimulatedLight::new();
    let (runner, _sink) = start(&sim, 1);
    let link = Arc::new(RunnerLink::new());
    let handle = spawn(runner, Arc::clone(&link)).unwrap();

    sim.fail_next_writes(u32::MAX);
    sim.fail_next_opens(u32::MAX);
    link.mailbox.post(RED);
    settle();
    link.mailbox.post(YELLOW);

    let result = handle.join().unwrap();
    assert!(matches!(result, Err(Error::DeviceUnreachable { .. })));
}

#[test]
fn terminate_switches_light_off_and_releases_it() {
    let sim = SimulatedLight::new();
    let (runner, sink) = start(&sim, 3);
    let link = Arc::new(RunnerLink::new());
    let handle = spawn(runner, Arc::clone(&link)).unwrap();

    link.mailbox.post(BLUE);
    settle();

    let mut handler = ShutdownHandler::new(Arc::clone(&link), DebugSwitch::new(), sink.clone());
    assert_eq!(
        handler.handle(SignalKind::Terminate),
        ShutdownOutcome::Exit {
            off_posted: true,
            released: true
        }
    );
    assert_eq!(sim.writes().last(), Some(&LedCommand::all_off()));
    assert_eq!(sim.side_colors(), (Rgb::OFF, Rgb::OFF));
    assert_eq!(sim.live_handles(), 0);
    handle.join().unwrap().unwrap();
    assert_eq!(sink.count(|e| *e == IndicatorEvent::ShutdownRequested), 1);
}
