//! Display frame composition
//!
//! The panel has three 7-segment digits and one position of discrete
//! status icons. The core decides what goes on it each iteration; the
//! driver only renders.

pub mod compose;

pub use compose::{ComposeInput, DisplayComposer, DisplayIntent, Glyph, Symbols, DIGIT_COUNT};
