//! User input
//!
//! Two push-buttons edit the setpoint.

pub mod setpoint;

pub use setpoint::{Button, ButtonEditState, EditOutcome, SetpointEditor};
