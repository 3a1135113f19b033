//! Heater duty policy
//!
//! The heater MOSFET is driven through an inverting stage: a higher PWM
//! duty means *less* heat and 100 % is fully off. Far below target the
//! heater runs at half power; within the last 50 units it ramps down
//! linearly so the tip does not overshoot.

use crate::config::ControlParams;
use crate::state::SleepState;

/// Duty that switches the heater off
pub const DUTY_OFF: u8 = 100;
/// Duty while far below target (half power)
pub const DUTY_FAR_BELOW: u8 = 50;
/// Duty when exactly at target
pub const DUTY_AT_TARGET: u8 = 90;
/// Width of the linear ramp below target
pub const RAMP_BAND: i32 = 50;
/// Duty applied at boot, before the first reading
pub const BOOT_DUTY_PERCENT: u8 = 50;

/// Maps (sleep state, setpoint, measured temperature) to a PWM duty
#[derive(Debug, Clone, Copy)]
pub struct DutyPolicy {
    min_heat: u16,
    max_heat: u16,
    min_adc_rt: u16,
    max_adc_rt: u16,
    sleep_temp: u16,
}

impl Default for DutyPolicy {
    fn default() -> Self {
        Self::from_params(&ControlParams::DEFAULT)
    }
}

impl DutyPolicy {
    /// Create a policy from the loop tuning
    pub const fn from_params(params: &ControlParams) -> Self {
        Self {
            min_heat: params.min_heat,
            max_heat: params.max_heat,
            min_adc_rt: params.min_adc_rt,
            max_adc_rt: params.max_adc_rt,
            sleep_temp: params.sleep_temp,
        }
    }

    /// Convert a filtered ADC reading to display units
    ///
    /// Linear map of `min_adc_rt..max_adc_rt` onto `0..(max_heat - min_heat)`,
    /// truncating toward zero. Readings below `min_adc_rt` give negative
    /// values.
    pub fn temperature(&self, adc: u16) -> i32 {
        let span = i32::from(self.max_heat) - i32::from(self.min_heat);
        let offset = i32::from(adc) - i32::from(self.min_adc_rt);
        let range = i32::from(self.max_adc_rt) - i32::from(self.min_adc_rt);
        span * offset / range
    }

    /// Temperature the heater regulates to in `sleep`
    pub const fn target(&self, sleep: SleepState, heat_point: u16) -> u16 {
        match sleep {
            SleepState::Sleep => self.sleep_temp,
            SleepState::NoSleep | SleepState::DeepSleep => heat_point,
        }
    }

    /// Duty for this iteration, always in `40..=100`
    pub fn duty(&self, sleep: SleepState, heat_point: u16, temperature: i32) -> u8 {
        if sleep == SleepState::DeepSleep {
            return DUTY_OFF;
        }
        let diff = i32::from(self.target(sleep, heat_point)) - temperature;
        ramp_duty(diff)
    }
}

/// Duty for a given `target - measured` difference
pub fn ramp_duty(diff: i32) -> u8 {
    if diff < 0 {
        DUTY_OFF
    } else if diff > RAMP_BAND {
        DUTY_FAR_BELOW
    } else {
        // 0 <= diff <= 50, so the result is 40..=90
        (i32::from(DUTY_AT_TARGET) - diff) as u8
    }
}
