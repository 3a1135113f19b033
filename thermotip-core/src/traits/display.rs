//! Segment display trait

use crate::display::{DisplayIntent, Glyph, Symbols};

/// Multiplexed 7-segment panel: numeric positions plus one icon position
///
/// Setters only update the frame buffer. [`SegmentDisplay::refresh`] is
/// called once per iteration and drives the multiplexing.
pub trait SegmentDisplay {
    /// Set numeric position `pos` (0 = leftmost)
    fn set_glyph(&mut self, pos: usize, glyph: Glyph);

    /// Set the icon position
    fn set_symbols(&mut self, symbols: Symbols);

    /// Advance multiplexing
    fn refresh(&mut self, now_ms: u32);

    /// Set numeric position `pos` to a decimal digit
    fn set_digit(&mut self, pos: usize, value: u8) {
        self.set_glyph(pos, Glyph::Digit(value));
    }

    /// Load a whole frame
    fn show(&mut self, intent: &DisplayIntent) {
        for (pos, glyph) in intent.digits.iter().enumerate() {
            self.set_glyph(pos, *glyph);
        }
        self.set_symbols(intent.symbols);
    }
}

impl<T: SegmentDisplay + ?Sized> SegmentDisplay for &mut T {
    fn set_glyph(&mut self, pos: usize, glyph: Glyph) {
        (**self).set_glyph(pos, glyph)
    }

    fn set_symbols(&mut self, symbols: Symbols) {
        (**self).set_symbols(symbols)
    }

    fn refresh(&mut self, now_ms: u32) {
        (**self).refresh(now_ms)
    }
}
