//! Board-agnostic regulation core for the Thermotip soldering station
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (ADC, heater, display, buzzer)
//! - Sensor filtering and fault detection
//! - Sleep state machine
//! - Heater duty policy
//! - Setpoint editing and deferred persistence
//! - Display frame composition
//! - The [`station::Station`] loop tying them together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod display;
pub mod filter;
pub mod input;
pub mod persist;
pub mod safety;
pub mod state;
pub mod station;
pub mod traits;

pub use station::{Board, BootReport, ConfigSource, Inputs, Report, SaveOutcome, Station};
