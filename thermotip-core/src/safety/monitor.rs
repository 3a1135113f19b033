//! Temperature sensor fault detection
//!
//! The sensor's filtered ADC reading sits in a narrow band while the tip
//! is intact. A reading pinned near zero means the sensor leads are
//! shorted; a reading near full scale means the sensor is open (broken
//! tip or unplugged handle).

use crate::config::ControlParams;

/// Sensor fault kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    /// Reading below the short-circuit threshold
    Shorted,
    /// Reading above the open-circuit threshold
    Open,
}

impl SensorFault {
    /// Code shown after "ER" on the display
    pub const fn code(self) -> u8 {
        match self {
            SensorFault::Shorted => 1,
            SensorFault::Open => 2,
        }
    }
}

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// Reading in range
    Ok,
    /// Heater must be forced off this iteration
    Fault(SensorFault),
}

impl SafetyStatus {
    /// Fault carried by this status, if any
    pub const fn fault(self) -> Option<SensorFault> {
        match self {
            SafetyStatus::Ok => None,
            SafetyStatus::Fault(fault) => Some(fault),
        }
    }
}

/// Range check on the filtered temperature reading
///
/// Stateless: a fault clears as soon as the reading returns to range.
#[derive(Debug, Clone, Copy)]
pub struct SensorMonitor {
    short_below: u16,
    open_above: u16,
}

impl Default for SensorMonitor {
    fn default() -> Self {
        Self::from_params(&ControlParams::DEFAULT)
    }
}

impl SensorMonitor {
    /// Create a monitor with explicit thresholds
    pub const fn new(short_below: u16, open_above: u16) -> Self {
        Self {
            short_below,
            open_above,
        }
    }

    /// Create a monitor from the loop tuning
    pub const fn from_params(params: &ControlParams) -> Self {
        Self::new(params.short_circuit_below, params.open_circuit_above)
    }

    /// Classify a filtered reading
    pub fn check(&self, reading: u16) -> SafetyStatus {
        if reading < self.short_below {
            SafetyStatus::Fault(SensorFault::Shorted)
        } else if reading > self.open_above {
            SafetyStatus::Fault(SensorFault::Open)
        } else {
            SafetyStatus::Ok
        }
    }
}
