//! Simulated light for host builds and tests.
//!
//! [`SimulatedLight`] is the observer half; [`SimOpener`] and the handles it
//! opens share its state, so a test can keep the light while the controller
//! owns the opener.  Failures are scripted with `fail_next_*`.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::app::ports::{DeviceOpener, Led, LedCommand, LightDevice};
use crate::display::Rgb;
use crate::error::DeviceError;

#[derive(Default)]
struct SimState {
    writes: Vec<LedCommand>,
    side1: Rgb,
    side2: Rgb,
    opens: usize,
    live: usize,
    failing_opens: u32,
    failing_writes: u32,
}

#[derive(Clone, Default)]
pub struct SimulatedLight {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedLight {
    pub fn new() -> Self {
        Self::default()
    }

    /// An opener bound to this light.
    pub fn opener(&self) -> SimOpener {
        SimOpener {
            state: Arc::clone(&self.state),
        }
    }

    /// Successful writes, oldest first.
    pub fn writes(&self) -> Vec<LedCommand> {
        self.lock().writes.clone()
    }

    /// Colours currently shown on each side.
    pub fn side_colors(&self) -> (Rgb, Rgb) {
        let state = self.lock();
        (state.side1, state.side2)
    }

    /// Successful opens.
    pub fn opens(&self) -> usize {
        self.lock().opens
    }

    /// Handles opened and not yet dropped.
    pub fn live_handles(&self) -> usize {
        self.lock().live
    }

    pub fn fail_next_opens(&self, count: u32) {
        self.lock().failing_opens = count;
    }

    pub fn fail_next_writes(&self, count: u32) {
        self.lock().failing_writes = count;
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        lock(&self.state)
    }
}

/// A poisoned lock only means a test thread panicked; the state is still usable.
fn lock(state: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct SimOpener {
    state: Arc<Mutex<SimState>>,
}

impl DeviceOpener for SimOpener {
    fn open_next(&mut self) -> Result<Box<dyn LightDevice>, DeviceError> {
        let mut state = lock(&self.state);
        if state.failing_opens > 0 {
            state.failing_opens -= 1;
            return Err(DeviceError::NotFound);
        }
        state.opens += 1;
        state.live += 1;
        Ok(Box::new(SimDevice {
            state: Arc::clone(&self.state),
        }))
    }
}

pub struct SimDevice {
    state: Arc<Mutex<SimState>>,
}

impl LightDevice for SimDevice {
    fn write(&mut self, command: &LedCommand) -> Result<(), DeviceError> {
        let mut state = lock(&self.state);
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(DeviceError::WriteFailed("simulated".into()));
        }
        match command.led {
            Led::All => {
                state.side1 = command.color;
                state.side2 = command.color;
            }
            Led::Side1 => state.side1 = command.color,
            Led::Side2 => state.side2 = command.color,
        }
        state.writes.push(*command);
        Ok(())
    }
}

impl Drop for SimDevice {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.live = state.live.saturating_sub(1);
    }
}
