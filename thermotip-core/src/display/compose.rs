//! Display composer
//!
//! Chooses between the measured temperature and the setpoint, lights the
//! status icons and derives their blink phase.

use core::ops::{BitOr, BitOrAssign};

use crate::config::{BlinkTiming, ControlParams};
use crate::control::DUTY_OFF;
use crate::state::SleepState;

/// Number of numeric positions on the panel
pub const DIGIT_COUNT: usize = 3;

/// Status icon bits for the symbol position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbols(u8);

impl Symbols {
    pub const NONE: Self = Self(0);
    /// Degrees Celsius unit
    pub const CELSIUS: Self = Self(1 << 0);
    /// Value shown is the setpoint
    pub const TEMP: Self = Self(1 << 1);
    /// Moon icon
    pub const SLEEP: Self = Self(1 << 2);
    /// Sun icon
    pub const HEAT: Self = Self(1 << 3);
    /// Record written to storage
    pub const SAVE: Self = Self(1 << 4);

    /// Build from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bit pattern
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Symbols {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Symbols {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Content of one numeric position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// All segments off
    #[default]
    Blank,
    /// Decimal digit 0-9
    Digit(u8),
    /// Letter E
    E,
    /// Letter r
    R,
    /// Middle segment only
    Minus,
}

/// Everything to render for one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayIntent {
    pub digits: [Glyph; DIGIT_COUNT],
    pub symbols: Symbols,
}

impl DisplayIntent {
    /// Nothing lit
    pub const BLANK: Self = Self {
        digits: [Glyph::Blank; DIGIT_COUNT],
        symbols: Symbols::NONE,
    };

    /// Three-digit decimal value, clamped into `0..=999`
    pub fn number(value: i32, symbols: Symbols) -> Self {
        let value = value.clamp(0, 999) as u16;
        Self {
            digits: [
                Glyph::Digit((value / 100) as u8),
                Glyph::Digit((value % 100 / 10) as u8),
                Glyph::Digit((value % 10) as u8),
            ],
            symbols,
        }
    }

    /// "ER" followed by the fault code
    pub const fn fault(code: u8) -> Self {
        Self {
            digits: [Glyph::E, Glyph::R, Glyph::Digit(code)],
            symbols: Symbols::NONE,
        }
    }

    /// Replace the icons with the save indicator for this frame
    pub fn mark_saving(&mut self) {
        self.symbols = Symbols::SAVE;
    }
}

/// Inputs to one composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeInput {
    /// Measured temperature
    pub measured: i32,
    /// Current setpoint
    pub heat_point: u16,
    /// A button is held this iteration
    pub buttons_active: bool,
    /// The post-edit setpoint window is open
    pub window_open: bool,
    pub sleep: SleepState,
    /// Heater duty applied this iteration
    pub duty: u8,
    /// Free-running loop counter
    pub iteration: u32,
    pub now_ms: u32,
}

/// Builds a [`DisplayIntent`] from the loop state
#[derive(Debug, Clone, Copy)]
pub struct DisplayComposer {
    setpoint_band: i32,
    sleep_blink_period: u32,
    heat_blink_period: u32,
    timing: BlinkTiming,
}

impl Default for DisplayComposer {
    fn default() -> Self {
        Self::from_params(&ControlParams::DEFAULT)
    }
}

impl DisplayComposer {
    /// Create a composer from the loop tuning
    pub fn from_params(params: &ControlParams) -> Self {
        Self {
            setpoint_band: i32::from(params.setpoint_band),
            sleep_blink_period: params.sleep_blink_period,
            heat_blink_period: params.heat_blink_period,
            timing: params.blink_timing,
        }
    }

    /// Compose the frame for this iteration
    pub fn compose(&self, input: &ComposeInput) -> DisplayIntent {
        let heat_point = i32::from(input.heat_point);
        let in_band = (input.measured - heat_point).abs() <= self.setpoint_band;

        let mut symbols = Symbols::CELSIUS;
        let value = if input.buttons_active || input.window_open || in_band {
            symbols |= Symbols::TEMP;
            heat_point
        } else {
            input.measured
        };

        let phase = match self.timing {
            BlinkTiming::IterationCount => input.iteration,
            BlinkTiming::Clock => input.now_ms,
        };
        if input.sleep.is_sleeping() && blink_on(phase, self.sleep_blink_period) {
            symbols |= Symbols::SLEEP;
        }
        if input.duty < DUTY_OFF && blink_on(phase, self.heat_blink_period) {
            symbols |= Symbols::HEAT;
        }

        if input.sleep == SleepState::DeepSleep {
            DisplayIntent {
                digits: [Glyph::Blank; DIGIT_COUNT],
                symbols,
            }
        } else {
            DisplayIntent::number(value, symbols)
        }
    }
}

/// Odd half-periods are lit
fn blink_on(phase: u32, half_period: u32) -> bool {
    (phase / half_period) % 2 == 1
}
