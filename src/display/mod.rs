//! What the indicator shows: colour states, how they combine, and how an
//! event's distance in time maps onto them.

pub mod algebra;
pub mod color;
pub mod mapper;
pub mod plan;

pub use algebra::{PrioritySide, apply_priority, combine, swap};
pub use color::{ColorState, Rgb};
pub use mapper::state_for_delta;
pub use plan::state_for_events;
