//! Display drivers

pub mod font;
pub mod seven_segment;

pub use font::{glyph_segments, Segments};
pub use seven_segment::{CommonPolarity, MultiplexedDisplay, POSITIONS, SEGMENT_LINES};
