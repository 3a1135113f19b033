//! Deferred setpoint persistence
//!
//! Every setpoint step marks the record dirty. The write happens once the
//! user has left the buttons alone for `save_timeout_ms`, so a long
//! auto-repeat costs one flash write instead of hundreds.

use crate::config::ControlParams;

/// Coalesces setpoint edits into a single delayed write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SaveDebouncer {
    /// Time of the most recent unsaved edit
    pending_since: Option<u32>,
    timeout_ms: u32,
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::from_params(&ControlParams::DEFAULT)
    }
}

impl SaveDebouncer {
    /// Create a debouncer with the given quiet period
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            pending_since: None,
            timeout_ms,
        }
    }

    /// Create a debouncer from the loop tuning
    pub const fn from_params(params: &ControlParams) -> Self {
        Self::new(params.save_timeout_ms)
    }

    /// Record an edit at `now_ms`, restarting the quiet period
    pub fn mark(&mut self, now_ms: u32) {
        self.pending_since = Some(now_ms);
    }

    /// Check if an edit is waiting to be written
    pub const fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Returns true exactly once per quiet period, clearing the pending edit
    pub fn poll(&mut self, now_ms: u32) -> bool {
        match self.pending_since {
            Some(since) if now_ms.wrapping_sub(since) > self.timeout_ms => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}
