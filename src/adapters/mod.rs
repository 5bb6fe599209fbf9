//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements               | Connects to                 |
//! |------------|--------------------------|-----------------------------|
//! | `blink1`   | DeviceOpener/LightDevice | blink(1) over an HID port   |
//! | `sim`      | DeviceOpener/LightDevice | In-memory light             |
//! | `log_sink` | EventSink                | `log` facade                |
//! | `clock`    | Clock                    | Host wall clock / fixed     |

pub mod blink1;
pub mod clock;
pub mod log_sink;
pub mod sim;
