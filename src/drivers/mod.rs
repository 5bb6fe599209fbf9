//! Device ownership, the pattern runner and its hand-off points.

pub mod controller;
pub mod mailbox;
pub mod pattern;
pub mod shutdown;

pub use controller::DeviceController;
pub use mailbox::Mailbox;
pub use pattern::{PatternRunner, RunnerLink};
pub use shutdown::{ShutdownHandler, ShutdownOutcome, SignalKind};
