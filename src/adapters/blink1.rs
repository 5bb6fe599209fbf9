//! blink(1) USB light adapter.
//!
//! The light takes 8-byte HID feature reports.  "Fade to RGB" is:
//!
//! ```text
//!  byte  0     1     2   3   4   5        6        7
//!       0x01  'c'    r   g   b   fade_hi  fade_lo  led
//! ```
//!
//! Fade time is in 10 ms units.  LED 0 addresses both sides, 1 and 2 one
//! side each.  The HID transport itself is injected through [`HidPort`] /
//! [`HidBus`] so this module stays free of USB bindings.

use log::{debug, info};

use crate::app::ports::{DeviceOpener, Led, LedCommand, LightDevice};
use crate::error::DeviceError;

pub const REPORT_ID: u8 = 0x01;
pub const REPORT_LEN: usize = 8;
const FADE_TO_RGB: u8 = b'c';
const FADE_UNIT_MS: u128 = 10;

/// A raw HID connection to one light.
pub trait HidPort: Send {
    fn send_feature_report(&mut self, report: &[u8; REPORT_LEN]) -> std::io::Result<()>;
}

/// Enumerates attached lights.
pub trait HidBus: Send {
    /// Serial numbers of the attached lights.
    fn serials(&mut self) -> std::io::Result<Vec<String>>;

    fn open(&mut self, serial: &str) -> std::io::Result<Box<dyn HidPort>>;
}

fn led_index(led: Led) -> u8 {
    match led {
        Led::All => 0,
        Led::Side1 => 1,
        Led::Side2 => 2,
    }
}

/// Encode a fade-to-RGB report.  Fades longer than the field holds saturate.
pub fn encode(command: &LedCommand) -> [u8; REPORT_LEN] {
    let units = (command.fade.as_millis() / FADE_UNIT_MS).min(u16::MAX as u128) as u16;
    let [fade_hi, fade_lo] = units.to_be_bytes();
    let color = command.color;
    [
        REPORT_ID,
        FADE_TO_RGB,
        color.red,
        color.green,
        color.blue,
        fade_hi,
        fade_lo,
        led_index(command.led),
    ]
}

/// Opens the first attached light on every call.
pub struct Blink1Opener<B: HidBus> {
    bus: B,
}

impl<B: HidBus> Blink1Opener<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B: HidBus> DeviceOpener for Blink1Opener<B> {
    fn open_next(&mut self) -> Result<Box<dyn LightDevice>, DeviceError> {
        let serials = self
            .bus
            .serials()
            .map_err(|e| DeviceError::OpenFailed(e.to_string()))?;
        let serial = serials.into_iter().next().ok_or(DeviceError::NotFound)?;
        let port = self
            .bus
            .open(&serial)
            .map_err(|e| DeviceError::OpenFailed(e.to_string()))?;
        info!("Opened blink(1) {}", serial);
        Ok(Box::new(Blink1 { serial, port }))
    }
}

pub struct Blink1 {
    serial: String,
    port: Box<dyn HidPort>,
}

impl LightDevice for Blink1 {
    fn write(&mut self, command: &LedCommand) -> Result<(), DeviceError> {
        let report = encode(command);
        debug!("blink(1) {} <- {:02x?}", self.serial, report);
        self.port
            .send_feature_report(&report)
            .map_err(|e| DeviceError::WriteFailed(e.to_string()))
    }
}

impl Drop for Blink1 {
    fn drop(&mut self) {
        debug!("Closing blink(1) {}", self.serial);
    }
}
