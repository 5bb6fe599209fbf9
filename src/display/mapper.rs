//! Minutes-until-start to display state.
//!
//! Bands are half-open and evaluated in order, so the boundaries
//! −1, 0, 2, 5, 10, 30 and 60 each belong to the band above them.

use super::color::{
    BLACK, BLUE, BLUE_FLASH, ColorState, FAST_RED_FLASH, GREEN, RED, RED_FLASH, YELLOW,
};

/// Upper bound (exclusive) in minutes and the state shown below it.
const BANDS: [(f64, ColorState); 7] = [
    (-1.0, BLUE),
    (0.0, BLUE_FLASH),
    (2.0, FAST_RED_FLASH),
    (5.0, RED_FLASH),
    (10.0, RED),
    (30.0, YELLOW),
    (60.0, GREEN),
];

/// Map `delta` (minutes until start, negative once begun) to a state.
pub fn state_for_delta(delta: f64) -> ColorState {
    BANDS
        .iter()
        .find(|(upper, _)| delta < *upper)
        .map_or(BLACK, |(_, state)| state.clone())
}
