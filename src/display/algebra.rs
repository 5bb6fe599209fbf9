//! Combining and re-siding display states.
//!
//! When two events share the device, each keeps its own side: the first
//! event's primary colour goes to side 1, the second event's primary colour
//! to side 2.  Combined states never alternate.

use serde::{Deserialize, Serialize};

use super::color::ColorState;

/// Which LED side should carry the flashing event when only one does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrioritySide {
    #[default]
    None,
    Side1,
    Side2,
}

impl PrioritySide {
    /// Map the numeric form used in configuration (0, 1, 2).
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::None),
            1 => Some(Self::Side1),
            2 => Some(Self::Side2),
            _ => None,
        }
    }
}

/// Pair two single-event states into one dual-sided state.
pub fn combine(first: &ColorState, second: &ColorState) -> ColorState {
    ColorState::dual(
        format!("{}/{}", first.name(), second.name()),
        (first.primary(), first.primary_flash()),
        (second.primary(), second.primary_flash()),
    )
}

/// Exchange sides 1 and 2.
pub fn swap(state: &ColorState) -> ColorState {
    ColorState::dual(
        format!("{} swapped", state.name()),
        (state.secondary(), state.secondary_flash()),
        (state.primary(), state.primary_flash()),
    )
}

/// Swap when exactly one side flashes and it is not the priority side.
///
/// Returns the state unchanged otherwise.
pub fn apply_priority(state: ColorState, priority: PrioritySide) -> ColorState {
    let side1_flashing = !state.primary_flash().is_zero();
    let side2_flashing = !state.secondary_flash().is_zero();
    let needs_swap = match priority {
        PrioritySide::None => false,
        PrioritySide::Side1 => !side1_flashing && side2_flashing,
        PrioritySide::Side2 => side1_flashing && !side2_flashing,
    };
    if needs_swap { swap(&state) } else { state }
}
