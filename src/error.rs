//! Unified error types for the calendar indicator.
//!
//! A single `Error` enum that every subsystem converts into, so the pattern
//! runner and the poll policy handle failures uniformly.  Hardware errors are
//! the only ones with retry semantics; the rest are either filtered out
//! upstream or fatal.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A device open or write failed; the next request or tick may heal it.
    Device(DeviceError),
    /// The device could not be reopened more times than the configured
    /// ceiling allows.  Fatal.
    DeviceUnreachable { failures: u32 },
    /// An event that already passed selection carries a start time that is
    /// not a parsed timestamp.  Fatal.
    InternalConsistency(String),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl Error {
    /// Whether the caller must stop the process rather than carry on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DeviceUnreachable { .. } | Self::InternalConsistency(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(e) => write!(f, "device: {e}"),
            Self::DeviceUnreachable { failures } => {
                write!(f, "device unreachable after {failures} consecutive failures")
            }
            Self::InternalConsistency(msg) => write!(f, "internal consistency: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No matching device is attached.
    NotFound,
    /// A device was found but could not be opened.
    OpenFailed(String),
    /// The device rejected or dropped a write.
    WriteFailed(String),
    /// A write was attempted with no open handle.
    NotOpen,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no device found"),
            Self::OpenFailed(msg) => write!(f, "open failed: {msg}"),
            Self::WriteFailed(msg) => write!(f, "write failed: {msg}"),
            Self::NotOpen => write!(f, "device not open"),
        }
    }
}

impl std::error::Error for DeviceError {}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be deserialized.
    Parse(String),
    /// A field failed range validation.
    /// The `&'static str` names the field and the rule.
    ValidationFailed(&'static str),
    /// A time-of-day field was not `HH:MM`.
    InvalidTime(String),
    /// A skip-day entry was not a weekday name.
    InvalidWeekday(String),
    /// A response-state policy name was not recognised.
    InvalidResponseState(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::InvalidTime(t) => write!(f, "invalid time of day '{t}'"),
            Self::InvalidWeekday(d) => write!(f, "invalid day in skip days '{d}'"),
            Self::InvalidResponseState(s) => write!(f, "invalid response state '{s}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
