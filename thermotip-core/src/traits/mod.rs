//! Hardware abstraction traits
//!
//! These traits define the interface between the regulation loop and the
//! board-specific peripherals. Pins, storage and time live in
//! `thermotip-hal`; the traits here carry station-specific types.

pub mod buzzer;
pub mod display;
pub mod heater;
pub mod sensor;

pub use buzzer::Buzzer;
pub use display::SegmentDisplay;
pub use heater::HeaterDrive;
pub use sensor::{AnalogSource, Channel};
