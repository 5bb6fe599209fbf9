//! Process-signal handling.
//!
//! The embedding binary maps its OS signals onto [`SignalKind`] and hands
//! them here.  A terminate request posts `BLACK` through the normal path
//! when the runner is healthy, then stops the runner, which performs one
//! raw all-off write before releasing the device.  The handler waits for
//! that, up to [`SHUTDOWN_GRACE`], before returning
//! [`ShutdownOutcome::Exit`]; the caller exits then.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use super::pattern::RunnerLink;
use crate::app::events::IndicatorEvent;
use crate::app::ports::EventSink;
use crate::diagnostics::DebugSwitch;
use crate::display::color::BLACK;

/// How long a terminate request waits for the runner to release the light.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Interrupt, terminate, hangup.
    Terminate,
    /// User-defined signal: raise verbosity.
    ToggleDebug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Keep running.
    Continue,
    /// The runner was told to stop; terminate the process.  `released` is
    /// false when the runner did not finish its off write in time.
    Exit { off_posted: bool, released: bool },
}

pub struct ShutdownHandler<S: EventSink> {
    link: Arc<RunnerLink>,
    debug: DebugSwitch,
    sink: S,
    grace: Duration,
}

impl<S: EventSink> ShutdownHandler<S> {
    pub fn new(link: Arc<RunnerLink>, debug: DebugSwitch, sink: S) -> Self {
        Self {
            link,
            debug,
            sink,
            grace: SHUTDOWN_GRACE,
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn handle(&mut self, signal: SignalKind) -> ShutdownOutcome {
        match signal {
            SignalKind::ToggleDebug => {
                self.debug.enable();
                self.sink.emit(&IndicatorEvent::DebugEnabled);
                ShutdownOutcome::Continue
            }
            SignalKind::Terminate => {
                self.sink.emit(&IndicatorEvent::ShutdownRequested);
                let off_posted = !self.link.is_failing();
                if off_posted {
                    self.link.mailbox.post(BLACK);
                } else {
                    info!("Device failing, skipping off request");
                }
                self.link.request_stop();
                let released = self.link.wait_released(self.grace);
                if !released {
                    warn!("Pattern runner did not stop within {:?}", self.grace);
                }
                ShutdownOutcome::Exit {
                    off_posted,
                    released,
                }
            }
        }
    }
}
