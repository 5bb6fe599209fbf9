//! Application core — poll policy, ports and events.
//!
//! All interaction with hardware, the network and the clock happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod poller;
pub mod ports;
