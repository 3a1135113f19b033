//! Power-saving state
//!
//! Derived every iteration from presence-sensor activity and the
//! persisted timeouts.

pub mod sleep;

pub use sleep::{SleepMonitor, SleepState, SleepUpdate};
