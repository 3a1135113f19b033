//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in thermotip-core and thermotip-hal for the station's peripherals:
//!
//! - Multiplexed 7-segment display with a status-icon position
//! - PWM heater drive with selectable output polarity
//! - Piezo buzzer with non-blocking tones
//! - ADC resolution adapter

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod display;
pub mod heater;
pub mod sensor;
