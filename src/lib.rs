//! Calendar indicator library.
//!
//! Drives a two-sided USB light from upcoming calendar events.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Blink1Opener     SimulatedLight   LogEventSink   SystemClock  │
//! │  (DeviceOpener)   (DeviceOpener)   (EventSink)    (Clock)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  Poller ──▶ calendar::select ──▶ display::plan         │    │
//! │  └───────────────────────────┬────────────────────────────┘    │
//! │                              │ Mailbox (latest wins)           │
//! │  ┌───────────────────────────▼────────────────────────────┐    │
//! │  │  PatternRunner ──▶ DeviceController                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Process lifecycle (argument parsing, OAuth, OS signal wiring) belongs
//! to the embedding binary.  Fatal errors ([`Error::is_fatal`]) are
//! returned to it and it is expected to exit.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod calendar;
pub mod config;
pub mod diagnostics;
pub mod display;
pub mod drivers;
pub mod error;

pub use error::{Error, Result};
