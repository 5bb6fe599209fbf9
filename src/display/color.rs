//! Display states for the two-sided indicator.
//!
//! A [`ColorState`] says what each LED side shows and how it flashes.  The
//! pattern runner compares incoming states by value to skip redundant
//! requests, so every field takes part in equality.
//!
//! ## Built-in states
//!
//! | State            | Side 1 / Side 2  | Flash   | Meaning                  |
//! |------------------|------------------|---------|--------------------------|
//! | `BLACK`          | off / off        | -       | nothing soon             |
//! | `GREEN`          | green / green    | -       | 30–60 min                |
//! | `YELLOW`         | amber / amber    | -       | 10–30 min                |
//! | `RED`            | red / red        | -       | 5–10 min                 |
//! | `RED_FLASH`      | red ⇄ off        | 500 ms  | 2–5 min                  |
//! | `FAST_RED_FLASH` | red ⇄ off        | 125 ms  | 0–2 min                  |
//! | `BLUE_FLASH`     | blue ⇄ red       | 500 ms  | meeting just started     |
//! | `BLUE`           | blue / blue      | -       | in a meeting             |
//! | `MAGENTA_FLASH`  | magenta ⇄ off    | 125 ms  | calendar fetch is stale  |

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// A 24-bit colour.  [`Rgb::OFF`] doubles as the "LED off" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const OFF: Self = Self::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn is_off(self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Immutable description of what the device should display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorState {
    name: Cow<'static, str>,
    primary: Rgb,
    secondary: Rgb,
    primary_flash: Duration,
    secondary_flash: Duration,
    alternate: bool,
}

impl ColorState {
    /// Same colour on both sides, no flashing.
    pub const fn solid(name: &'static str, color: Rgb) -> Self {
        Self {
            name: Cow::Borrowed(name),
            primary: color,
            secondary: color,
            primary_flash: Duration::ZERO,
            secondary_flash: Duration::ZERO,
            alternate: false,
        }
    }

    /// Sides swap between `first` and `second` every `period`.
    pub const fn alternating(name: &'static str, first: Rgb, second: Rgb, period: Duration) -> Self {
        Self {
            name: Cow::Borrowed(name),
            primary: first,
            secondary: second,
            primary_flash: period,
            secondary_flash: Duration::ZERO,
            alternate: true,
        }
    }

    /// Each side flashes independently against off.  Never alternating.
    pub fn dual(
        name: impl Into<Cow<'static, str>>,
        side1: (Rgb, Duration),
        side2: (Rgb, Duration),
    ) -> Self {
        Self {
            name: name.into(),
            primary: side1.0,
            secondary: side2.0,
            primary_flash: side1.1,
            secondary_flash: side2.1,
            alternate: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn primary(&self) -> Rgb {
        self.primary
    }

    pub const fn secondary(&self) -> Rgb {
        self.secondary
    }

    pub const fn primary_flash(&self) -> Duration {
        self.primary_flash
    }

    pub const fn secondary_flash(&self) -> Duration {
        self.secondary_flash
    }

    pub const fn alternate(&self) -> bool {
        self.alternate
    }

    /// True when either side has a nonzero flash period.
    pub fn is_flashing(&self) -> bool {
        !self.primary_flash.is_zero() || !self.secondary_flash.is_zero()
    }
}

impl fmt::Display for ColorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ── Colours ───────────────────────────────────────────────────

pub const COLOR_GREEN: Rgb = Rgb::new(0, 255, 0);
pub const COLOR_YELLOW: Rgb = Rgb::new(255, 160, 0); // Amber, reads as yellow on the diffuser
pub const COLOR_RED: Rgb = Rgb::new(255, 0, 0);
pub const COLOR_BLUE: Rgb = Rgb::new(0, 0, 255);
pub const COLOR_MAGENTA: Rgb = Rgb::new(255, 0, 255);

const SLOW_FLASH: Duration = Duration::from_millis(500);
const FAST_FLASH: Duration = Duration::from_millis(125);

// ── States ────────────────────────────────────────────────────

pub const BLACK: ColorState = ColorState {
    name: Cow::Borrowed("Black"),
    primary: Rgb::OFF,
    secondary: Rgb::OFF,
    primary_flash: Duration::ZERO,
    secondary_flash: Duration::ZERO,
    alternate: false,
};
pub const GREEN: ColorState = ColorState::solid("Green", COLOR_GREEN);
pub const YELLOW: ColorState = ColorState::solid("Yellow", COLOR_YELLOW);
pub const RED: ColorState = ColorState::solid("Red", COLOR_RED);
pub const BLUE: ColorState = ColorState::solid("Blue", COLOR_BLUE);
pub const RED_FLASH: ColorState =
    ColorState::alternating("Red Flash", COLOR_RED, Rgb::OFF, SLOW_FLASH);
pub const FAST_RED_FLASH: ColorState =
    ColorState::alternating("Fast Red Flash", COLOR_RED, Rgb::OFF, FAST_FLASH);
pub const BLUE_FLASH: ColorState =
    ColorState::alternating("Red-Blue Flash", COLOR_BLUE, COLOR_RED, SLOW_FLASH);
pub const MAGENTA_FLASH: ColorState =
    ColorState::alternating("Magenta Flash", COLOR_MAGENTA, Rgb::OFF, FAST_FLASH);
