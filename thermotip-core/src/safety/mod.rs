//! Safety monitoring
//!
//! Detects sensor faults that force the heater off.

pub mod monitor;

pub use monitor::{SafetyStatus, SensorFault, SensorMonitor};
