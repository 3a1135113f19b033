//! Heater drive implementations

pub mod pwm;

pub use pwm::{OutputPolarity, PwmHeater};
