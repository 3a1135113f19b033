//! Heater control

pub mod duty;

pub use duty::{ramp_duty, DutyPolicy, BOOT_DUTY_PERCENT, DUTY_OFF};
