//! Pattern runner: turns display requests plus a flash timer into writes.
//!
//! The runner is the only task that touches the [`DeviceController`].  It
//! waits on three sources and handles exactly one per iteration:
//!
//! ```text
//!  Mailbox ───────▶ ┌─────────────────────┐
//!  Flash timer ───▶ │    PatternRunner    │ ──▶ DeviceController ──▶ light
//!  Stop signal ───▶ └─────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - A request equal to the current state is ignored unless the last write
//!   failed.
//! - Flashing states arm the timer almost immediately; solid states cancel
//!   it and write once.
//! - Each tick writes one phase and rearms for the period just used.
//! - The timer runs against an absolute deadline, so ignored requests do
//!   not push the next tick back.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};
use futures_lite::future;
use log::info;

use super::controller::DeviceController;
use super::mailbox::Mailbox;
use crate::app::events::IndicatorEvent;
use crate::app::ports::{EventSink, LedCommand};
use crate::display::color::BLACK;
use crate::display::{ColorState, Rgb};
use crate::error::Result;

/// Delay before the first tick of a newly adopted flashing state.
const FIRST_TICK: Duration = Duration::from_millis(1);

// ── Shared link ───────────────────────────────────────────────

/// Everything the outside world shares with a running runner.
pub struct RunnerLink {
    pub mailbox: Mailbox,
    stop: Signal<CriticalSectionRawMutex, ()>,
    released: Signal<CriticalSectionRawMutex, ()>,
    failing: AtomicBool,
}

impl RunnerLink {
    pub const fn new() -> Self {
        Self {
            mailbox: Mailbox::new(),
            stop: Signal::new(),
            released: Signal::new(),
            failing: AtomicBool::new(false),
        }
    }

    /// Ask the runner to switch off, release the device and return.
    pub fn request_stop(&self) {
        self.stop.signal(());
    }

    /// Block until the runner has left its loop, at most `timeout`.
    /// Returns `false` on timeout.
    pub fn wait_released(&self, timeout: Duration) -> bool {
        future::block_on(future::race(
            async {
                self.released.wait().await;
                self.released.signal(());
                true
            },
            async {
                Timer::after(to_embassy(timeout)).await;
                false
            },
        ))
    }

    /// Whether the runner's last write failed.
    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::Acquire)
    }

    fn publish_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }
}

impl Default for RunnerLink {
    fn default() -> Self {
        Self::new()
    }
}

enum Wake {
    Request(ColorState),
    Tick,
    Stop,
}

// ── Runner ────────────────────────────────────────────────────

pub struct PatternRunner<S: EventSink> {
    controller: DeviceController,
    sink: S,
    current: ColorState,
    failing: bool,
    /// Second phase of the alternation.
    flipped: bool,
    /// Armed timer period, `None` when solid.
    next_tick: Option<Duration>,
    /// When the armed timer fires.
    deadline: Option<Instant>,
}

impl<S: EventSink> PatternRunner<S> {
    /// Start in `BLACK` with one immediate write.
    ///
    /// A failed first write leaves the runner `failing`: the device could
    /// not be reached even once.
    pub fn new(controller: DeviceController, sink: S) -> Result<Self> {
        let mut runner = Self {
            controller,
            sink,
            current: BLACK,
            failing: false,
            flipped: false,
            next_tick: None,
            deadline: None,
        };
        runner.write_solid()?;
        runner.sink.emit(&IndicatorEvent::Started {
            failing: runner.failing,
        });
        Ok(runner)
    }

    pub fn current(&self) -> &ColorState {
        &self.current
    }

    pub fn is_failing(&self) -> bool {
        self.failing
    }

    /// Period of the armed flash timer.
    pub fn next_tick(&self) -> Option<Duration> {
        self.next_tick
    }

    pub fn controller(&self) -> &DeviceController {
        &self.controller
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Apply a new display request.  Only fatal errors are returned.
    pub fn handle_request(&mut self, state: ColorState) -> Result<()> {
        if state == self.current && !self.failing {
            self.sink.emit(&IndicatorEvent::StateRetained(state.name().to_owned()));
            return Ok(());
        }

        self.sink.emit(&IndicatorEvent::StateChanged {
            from: self.current.name().to_owned(),
            to: state.name().to_owned(),
        });
        self.current = state;
        self.flipped = false;

        if self.current.is_flashing() {
            self.arm(FIRST_TICK);
            return Ok(());
        }
        if self.disarm() {
            self.sink.emit(&IndicatorEvent::TimerCancelled);
        }
        self.write_solid()
    }

    /// Write the next phase of the current flashing state and rearm.
    pub fn handle_tick(&mut self) -> Result<()> {
        let state = &self.current;
        let (mut side1, mut side2) = (state.primary(), state.secondary());
        if self.flipped {
            if state.alternate() {
                core::mem::swap(&mut side1, &mut side2);
            } else {
                if !state.primary_flash().is_zero() {
                    side1 = Rgb::OFF;
                }
                if !state.secondary_flash().is_zero() {
                    side2 = Rgb::OFF;
                }
            }
        }
        let fade1 = state.primary_flash();
        let fade2 = if state.alternate() {
            fade1
        } else {
            state.secondary_flash()
        };
        let next = if fade1.is_zero() { fade2 } else { fade1 };

        self.write((side1, fade1), (side2, fade2))?;
        self.flipped = !self.flipped;
        if next.is_zero() {
            self.disarm();
        } else {
            self.arm(next);
        }
        self.sink.emit(&IndicatorEvent::TimerFired { side1, side2, next });
        Ok(())
    }

    /// Switch everything off with one raw write and release the device.
    pub fn shut_down(&mut self) {
        self.disarm();
        if let Err(e) = self.controller.write_direct(&LedCommand::all_off()) {
            log::warn!("Final off write failed: {}", e);
        }
        self.controller.close();
    }

    /// The event loop.  Returns `Ok` after a stop request, `Err` on a fatal
    /// device error.
    pub async fn run(&mut self, link: &RunnerLink) -> Result<()> {
        link.publish_failing(self.failing);
        loop {
            let requested = async { Wake::Request(link.mailbox.receive().await) };
            let stopped = async {
                link.stop.wait().await;
                Wake::Stop
            };
            let wake = match self.deadline {
                None => future::race(requested, stopped).await,
                Some(deadline) => {
                    let ticked = async {
                        Timer::at(deadline).await;
                        Wake::Tick
                    };
                    future::race(stopped, future::race(requested, ticked)).await
                }
            };

            match wake {
                Wake::Request(state) => self.handle_request(state)?,
                Wake::Tick => self.handle_tick()?,
                Wake::Stop => {
                    info!("Pattern runner stopping");
                    self.shut_down();
                    return Ok(());
                }
            }
            link.publish_failing(self.failing);
        }
    }

    fn arm(&mut self, after: Duration) {
        self.next_tick = Some(after);
        self.deadline = Some(Instant::now() + to_embassy(after));
    }

    /// Returns whether a timer was armed.
    fn disarm(&mut self) -> bool {
        self.deadline = None;
        self.next_tick.take().is_some()
    }

    fn write_solid(&mut self) -> Result<()> {
        let (side1, side2) = (self.current.primary(), self.current.secondary());
        self.write((side1, Duration::ZERO), (side2, Duration::ZERO))
    }

    /// Recoverable failures mark the runner failing; fatal ones propagate.
    fn write(&mut self, side1: (Rgb, Duration), side2: (Rgb, Duration)) -> Result<()> {
        match self.controller.set_channel_states(side1, side2) {
            Ok(()) => {
                self.failing = false;
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.failing = true;
                self.sink.emit(&IndicatorEvent::WriteFailed(e));
                Ok(())
            }
        }
    }
}

fn to_embassy(duration: Duration) -> embassy_time::Duration {
    embassy_time::Duration::from_micros(duration.as_micros() as u64)
}

/// Run `runner` on a dedicated thread until it stops or fails fatally.
/// The link is marked released once the loop has returned.
pub fn spawn<S: EventSink + 'static>(
    mut runner: PatternRunner<S>,
    link: Arc<RunnerLink>,
) -> std::io::Result<JoinHandle<Result<()>>> {
    std::thread::Builder::new()
        .name("pattern-runner".into())
        .spawn(move || {
            let result = future::block_on(runner.run(&link));
            drop(runner);
            link.released.signal(());
            result
        })
}
