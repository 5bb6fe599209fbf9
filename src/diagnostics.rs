//! Runtime verbosity.
//!
//! [`DebugSwitch`] is the one piece of process-wide mutable state.  It is
//! created once with [`DebugSwitch::install`]; every later install hands
//! back the same switch.  Components never read a global: they are given a
//! handle (usually inside a [`LogEventSink`](crate::adapters::log_sink::LogEventSink)).
//! Turning debug on is one-way, matching the user signal that drives it.

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

static INSTALLED: OnceLock<DebugSwitch> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct DebugSwitch {
    enabled: Arc<AtomicBool>,
}

impl DebugSwitch {
    /// A detached switch, starting off.  Tests and embedders that manage
    /// their own wiring use this instead of [`install`](Self::install).
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide switch.
    pub fn install() -> Self {
        INSTALLED.get_or_init(Self::new).clone()
    }

    /// Switch debug output on.
    pub fn enable(&self) {
        if !self.enabled.swap(true, Ordering::AcqRel) {
            info!("Debug output enabled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Whether two handles refer to the same switch.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.enabled, &other.enabled)
    }
}
