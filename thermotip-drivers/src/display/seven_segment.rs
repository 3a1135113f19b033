//! Multiplexed 7-segment display
//!
//! Three digit positions and one icon position share eight segment lines.
//! Each [`SegmentDisplay::refresh`] call lights the next position, so the
//! control loop's own pacing drives the multiplexing and no timer
//! interrupt is needed.
//!
//! The icon position takes [`Symbols`] bits straight onto the segment
//! lines; each status LED sits on its own line.

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};
use thermotip_core::display::{Glyph, Symbols, DIGIT_COUNT};
use thermotip_core::traits::SegmentDisplay;

use super::font::{glyph_segments, Segments};

/// Segment lines: a-g plus the decimal point
pub const SEGMENT_LINES: usize = 8;
/// Digit positions plus the icon position
pub const POSITIONS: usize = DIGIT_COUNT + 1;

/// Level on a common line that enables its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommonPolarity {
    /// Common cathode pulled low to enable
    #[default]
    ActiveLow,
    /// Common line driven high to enable (common anode via PNP)
    ActiveHigh,
}

/// Display scanned one position per refresh
pub struct MultiplexedDisplay<P> {
    segments: [P; SEGMENT_LINES],
    commons: [P; POSITIONS],
    polarity: CommonPolarity,
    frame: [Segments; POSITIONS],
    /// Position currently lit
    active: usize,
    last_switch_ms: Option<u32>,
    /// Minimum time each position stays lit
    hold_ms: u32,
}

impl<P: OutputPin<Error = Infallible>> MultiplexedDisplay<P> {
    /// Take ownership of the lines; everything starts dark
    pub fn new(
        segments: [P; SEGMENT_LINES],
        commons: [P; POSITIONS],
        polarity: CommonPolarity,
        hold_ms: u32,
    ) -> Self {
        let mut display = Self {
            segments,
            commons,
            polarity,
            frame: [0; POSITIONS],
            active: POSITIONS - 1,
            last_switch_ms: None,
            hold_ms,
        };
        for pos in 0..POSITIONS {
            display.enable_common(pos, false);
        }
        display.drive_segments(0);
        display
    }

    /// Segment pattern buffered for `pos`
    pub fn frame(&self, pos: usize) -> Option<Segments> {
        self.frame.get(pos).copied()
    }

    /// Position lit by the last refresh
    pub fn active_position(&self) -> usize {
        self.active
    }

    fn enable_common(&mut self, pos: usize, on: bool) {
        let level = match self.polarity {
            CommonPolarity::ActiveLow => !on,
            CommonPolarity::ActiveHigh => on,
        };
        drive(&mut self.commons[pos], level);
    }

    fn drive_segments(&mut self, pattern: Segments) {
        for (line, pin) in self.segments.iter_mut().enumerate() {
            drive(pin, pattern & (1 << line) != 0);
        }
    }
}

impl<P: OutputPin<Error = Infallible>> SegmentDisplay for MultiplexedDisplay<P> {
    fn set_glyph(&mut self, pos: usize, glyph: Glyph) {
        if pos < DIGIT_COUNT {
            self.frame[pos] = glyph_segments(glyph);
        }
    }

    fn set_symbols(&mut self, symbols: Symbols) {
        self.frame[DIGIT_COUNT] = symbols.bits();
    }

    fn refresh(&mut self, now_ms: u32) {
        if let Some(last) = self.last_switch_ms {
            if now_ms.wrapping_sub(last) < self.hold_ms {
                return;
            }
        }

        // Dark while the segment lines change, so no ghosting
        self.enable_common(self.active, false);
        self.active = (self.active + 1) % POSITIONS;
        self.drive_segments(self.frame[self.active]);
        self.enable_common(self.active, true);
        self.last_switch_ms = Some(now_ms);
    }
}

fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    match pin.set_state(PinState::from(high)) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}
