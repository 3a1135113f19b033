//! Sleep state machine
//!
//! The handle carries a presence (tilt/vibration) switch. Every edge on it
//! counts as activity. Long enough without activity the station drops to
//! the sleep temperature, and later switches the heater off entirely.

/// Power-saving state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepState {
    /// Regulating to the user's setpoint
    #[default]
    NoSleep,
    /// Regulating to the sleep temperature
    Sleep,
    /// Heater off, display blank
    DeepSleep,
}

impl SleepState {
    /// True for both sleep levels
    pub const fn is_sleeping(self) -> bool {
        !matches!(self, SleepState::NoSleep)
    }
}

/// Result of one sleep-state evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleepUpdate {
    /// State reported for this iteration
    pub state: SleepState,
    /// Reported state differs from the previous iteration
    pub changed: bool,
}

/// Tracks presence-sensor activity and derives the sleep state
#[derive(Debug, Clone)]
pub struct SleepMonitor {
    /// Presence pin level seen on the previous evaluation
    last_level: bool,
    /// Timestamp of the most recent presence edge (or boot)
    last_activity_ms: u32,
    /// State reported on the previous evaluation
    reported: SleepState,
}

impl SleepMonitor {
    /// Create a monitor that counts `now_ms` as the last activity
    pub const fn new(now_ms: u32) -> Self {
        Self {
            last_level: false,
            last_activity_ms: now_ms,
            reported: SleepState::NoSleep,
        }
    }

    /// Evaluate the sleep state for this iteration
    ///
    /// The deep-sleep check runs first; with `deep_sleep_timeout_ms` not
    /// above `sleep_timeout_ms` the station goes straight to deep sleep.
    pub fn update(
        &mut self,
        presence_high: bool,
        now_ms: u32,
        sleep_timeout_ms: u32,
        deep_sleep_timeout_ms: u32,
    ) -> SleepUpdate {
        let state = if presence_high != self.last_level {
            self.last_level = presence_high;
            self.last_activity_ms = now_ms;
            SleepState::NoSleep
        } else if self.reported == SleepState::DeepSleep {
            // Only an edge leaves deep sleep; idle time wraps after 2^32 ms
            SleepState::DeepSleep
        } else {
            let idle_ms = now_ms.wrapping_sub(self.last_activity_ms);
            if idle_ms > deep_sleep_timeout_ms {
                SleepState::DeepSleep
            } else if idle_ms > sleep_timeout_ms {
                SleepState::Sleep
            } else {
                SleepState::NoSleep
            }
        };

        let changed = state != self.reported;
        self.reported = state;

        SleepUpdate { state, changed }
    }

    /// State reported on the last evaluation
    pub const fn state(&self) -> SleepState {
        self.reported
    }

    /// Timestamp of the last presence edge
    pub const fn last_activity_ms(&self) -> u32 {
        self.last_activity_ms
    }
}
