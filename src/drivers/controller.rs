//! Device controller, sole owner of the light handle.
//!
//! Applies colour commands with a bounded recovery protocol:
//!
//! 1. If the previous attempt left failures behind, reopen the device
//!    before writing.
//! 2. Write.  On failure reopen once and write once more; a second failure
//!    is reported but not fatal (the next request or tick retries).
//! 3. Any successful write or reopen clears the failure count.
//!
//! A reopen that pushes the count past `max_failures` is fatal:
//! [`Error::DeviceUnreachable`].

use log::{debug, info, warn};

use crate::app::ports::{DeviceOpener, Led, LedCommand, LightDevice};
use crate::display::Rgb;
use crate::error::{DeviceError, Error, Result};
use std::time::Duration;

pub struct DeviceController {
    opener: Box<dyn DeviceOpener>,
    /// The live session.  `None` between a failed open and the next reopen.
    device: Option<Box<dyn LightDevice>>,
    consecutive_failures: u32,
    max_failures: u32,
}

impl DeviceController {
    /// Open the first device.
    ///
    /// A failed first open is recorded like any other failure and only
    /// returned as an error when it is already fatal (`max_failures == 0`).
    pub fn new(opener: Box<dyn DeviceOpener>, max_failures: u32) -> Result<Self> {
        let mut controller = Self {
            opener,
            device: None,
            consecutive_failures: 0,
            max_failures,
        };
        match controller.reinitialize() {
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("Initial device open failed: {}", e);
                Ok(controller)
            }
            Ok(()) => Ok(controller),
        }
    }

    /// Failures since the last successful open or write.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// No failures outstanding.
    pub fn is_healthy(&self) -> bool {
        self.consecutive_failures == 0
    }

    /// Close any stale handle and open the next device.
    pub fn reinitialize(&mut self) -> Result<()> {
        // Dropping the box closes the old handle before the new open.
        self.device = None;
        match self.opener.open_next() {
            Ok(device) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "Device reopened after {} failure(s)",
                        self.consecutive_failures
                    );
                }
                self.device = Some(device);
                self.consecutive_failures = 0;
                Ok(())
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures > self.max_failures {
                    log::error!("Unable to initialize device: {}", e);
                    return Err(Error::DeviceUnreachable {
                        failures: self.consecutive_failures,
                    });
                }
                warn!(
                    "Device open failed ({}/{}): {}",
                    self.consecutive_failures, self.max_failures, e
                );
                Err(e.into())
            }
        }
    }

    /// Write one command with the reopen-and-retry protocol.
    pub fn set_led(&mut self, command: &LedCommand) -> Result<()> {
        if self.consecutive_failures > 0 {
            self.reinitialize().inspect_err(|e| {
                debug!("Reinitialize failed, error {}", e);
            })?;
        }
        match self.write_once(command) {
            Ok(()) => {
                self.consecutive_failures = 0;
                Ok(())
            }
            Err(e) => {
                debug!("Re-initializing because of error {}", e);
                self.reinitialize().inspect_err(|e| {
                    debug!("Reinitialize failed, error {}", e);
                })?;
                self.write_once(command).map_err(|e| {
                    debug!("Setting device state failed, error {}", e);
                    Error::Device(e)
                })
            }
        }
    }

    /// Write both sides.  Side 2 is attempted even if side 1 failed,
    /// unless that failure was fatal.
    pub fn set_channel_states(
        &mut self,
        side1: (Rgb, Duration),
        side2: (Rgb, Duration),
    ) -> Result<()> {
        let first = self.set_led(&LedCommand::new(Led::Side1, side1.0, side1.1));
        if matches!(&first, Err(e) if e.is_fatal()) {
            return first;
        }
        let second = self.set_led(&LedCommand::new(Led::Side2, side2.0, side2.1));
        match (first, second) {
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Err(e), Err(fatal)) if fatal.is_fatal() => {
                debug!("Side 1 failure superseded: {}", e);
                Err(fatal)
            }
            (Err(e), Err(_)) => Err(e),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    /// One raw write, no recovery.  Used on the way out.
    pub fn write_direct(&mut self, command: &LedCommand) -> core::result::Result<(), DeviceError> {
        self.write_once(command)
    }

    /// Release the handle.
    pub fn close(&mut self) {
        if self.device.take().is_some() {
            info!("Device released");
        }
    }

    fn write_once(&mut self, command: &LedCommand) -> core::result::Result<(), DeviceError> {
        self.device
            .as_mut()
            .ok_or(DeviceError::NotOpen)?
            .write(command)
    }
}
