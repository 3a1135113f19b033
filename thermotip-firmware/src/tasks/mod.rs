//! Embassy async tasks
//!
//! The tick task owns time; the control task owns everything else.

pub mod control;
pub mod tick;

pub use control::control_task;
pub use tick::{tick_task, CLOCK};
