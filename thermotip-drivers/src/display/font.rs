//! 7-segment font
//!
//! Bit `n` drives segment line `n`: a (0) through g (6), decimal point (7).
//!
//! ```text
//!  aaa
//! f   b
//!  ggg
//! e   c
//!  ddd  .
//! ```

use thermotip_core::display::Glyph;

/// Segment bit pattern
pub type Segments = u8;

const DIGITS: [Segments; 10] = [
    0x3F, // 0
    0x06, // 1
    0x5B, // 2
    0x4F, // 3
    0x66, // 4
    0x6D, // 5
    0x7D, // 6
    0x07, // 7
    0x7F, // 8
    0x6F, // 9
];

const LETTER_E: Segments = 0x79;
const LETTER_R: Segments = 0x50;
const MINUS: Segments = 0x40;

/// Segment pattern for a glyph; out-of-range digits render blank
pub const fn glyph_segments(glyph: Glyph) -> Segments {
    match glyph {
        Glyph::Blank => 0,
        Glyph::Digit(d) if (d as usize) < DIGITS.len() => DIGITS[d as usize],
        Glyph::Digit(_) => 0,
        Glyph::E => LETTER_E,
        Glyph::R => LETTER_R,
        Glyph::Minus => MINUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_patterns() {
        assert_eq!(glyph_segments(Glyph::Digit(0)), 0x3F);
        assert_eq!(glyph_segments(Glyph::Digit(8)), 0x7F);
        // 1 lights only b and c
        assert_eq!(glyph_segments(Glyph::Digit(1)), 0b0000_0110);
    }

    #[test]
    fn test_letters_and_blank() {
        assert_eq!(glyph_segments(Glyph::Blank), 0);
        assert_eq!(glyph_segments(Glyph::E), 0x79);
        assert_eq!(glyph_segments(Glyph::R), 0x50);
        assert_eq!(glyph_segments(Glyph::Minus), 0x40);
    }

    #[test]
    fn test_invalid_digit_is_blank() {
        assert_eq!(glyph_segments(Glyph::Digit(10)), 0);
    }
}
