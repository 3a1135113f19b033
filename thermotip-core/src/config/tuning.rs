//! Control-loop tuning parameters
//!
//! Compile-time constants for the regulation loop. The firmware build
//! script can override them from `station.toml`; anything not overridden
//! takes the values below.

use super::record::PersistedConfig;

/// Lowest selectable setpoint (display units)
pub const MIN_HEAT: u16 = 50;
/// Highest selectable setpoint (display units)
pub const MAX_HEAT: u16 = 450;
/// Target while in light sleep
pub const SLEEP_TEMP: u16 = 100;

/// Filtered ADC reading that maps to `0` on the temperature scale
pub const MIN_ADC_RT: u16 = 40;
/// Filtered ADC reading that maps to `MAX_HEAT - MIN_HEAT`
pub const MAX_ADC_RT: u16 = 130;

/// Filtered readings below this mean the sensor is shorted
pub const SHORT_CIRCUIT_BELOW: u16 = 10;
/// Filtered readings above this mean the sensor is open
pub const OPEN_CIRCUIT_ABOVE: u16 = 1000;

/// Hold time before a single step fires
pub const SHORT_PRESS_MS: u32 = 700;
/// Hold time before auto-repeat starts
pub const LONG_PRESS_MS: u32 = 1800;
/// Auto-repeat fires once every this many loop iterations
pub const FAST_INCREMENT: u16 = 40;
/// Quiet period before a setpoint edit is written to storage
pub const SAVE_TIMEOUT_MS: u32 = 2000;
/// How long the setpoint stays on the display after a button press
pub const SETPOINT_DISPLAY_MS: u32 = 5000;
/// Measured temperature within this band of the setpoint shows the setpoint
pub const SETPOINT_BAND: u16 = 10;

/// Sleep icon blink half-period (~1 Hz at a 1 ms loop)
pub const SLEEP_BLINK_PERIOD: u32 = 500;
/// Heater icon blink half-period (~10 Hz at a 1 ms loop)
pub const HEAT_BLINK_PERIOD: u32 = 50;

/// How the two buttons share press timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerSharing {
    /// One set of press timers for both buttons
    #[default]
    Shared,
    /// Each button tracks its own press timers
    Independent,
}

/// Where blink phases come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkTiming {
    /// Free-running loop iteration counter
    #[default]
    IterationCount,
    /// Monotonic millisecond clock
    Clock,
}

/// Invalid tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamsError {
    /// `min_heat` must be below `max_heat`
    HeatRange,
    /// `min_adc_rt` must be below `max_adc_rt`
    AdcRange,
    /// Fault thresholds must leave a usable reading range
    FaultThresholds,
    /// Short press must fire before long press starts
    PressTiming,
    /// Repeat divider and blink periods must be non-zero
    ZeroPeriod,
    /// Default setpoint outside `min_heat..=max_heat`
    DefaultHeatPoint,
    /// Default deep-sleep timeout must exceed the sleep timeout
    SleepOrdering,
}

/// Complete tuning of the regulation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlParams {
    pub min_heat: u16,
    pub max_heat: u16,
    pub sleep_temp: u16,
    pub min_adc_rt: u16,
    pub max_adc_rt: u16,
    pub short_circuit_below: u16,
    pub open_circuit_above: u16,
    pub short_press_ms: u32,
    pub long_press_ms: u32,
    pub fast_increment: u16,
    pub save_timeout_ms: u32,
    pub setpoint_display_ms: u32,
    pub setpoint_band: u16,
    pub sleep_blink_period: u32,
    pub heat_blink_period: u32,
    pub timer_sharing: TimerSharing,
    pub blink_timing: BlinkTiming,
    /// Record written when storage is blank or unreadable
    pub default_config: PersistedConfig,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ControlParams {
    /// Stock tuning
    pub const DEFAULT: Self = Self {
        min_heat: MIN_HEAT,
        max_heat: MAX_HEAT,
        sleep_temp: SLEEP_TEMP,
        min_adc_rt: MIN_ADC_RT,
        max_adc_rt: MAX_ADC_RT,
        short_circuit_below: SHORT_CIRCUIT_BELOW,
        open_circuit_above: OPEN_CIRCUIT_ABOVE,
        short_press_ms: SHORT_PRESS_MS,
        long_press_ms: LONG_PRESS_MS,
        fast_increment: FAST_INCREMENT,
        save_timeout_ms: SAVE_TIMEOUT_MS,
        setpoint_display_ms: SETPOINT_DISPLAY_MS,
        setpoint_band: SETPOINT_BAND,
        sleep_blink_period: SLEEP_BLINK_PERIOD,
        heat_blink_period: HEAT_BLINK_PERIOD,
        timer_sharing: TimerSharing::Shared,
        blink_timing: BlinkTiming::IterationCount,
        default_config: PersistedConfig::DEFAULT,
    };

    /// Check parameter consistency
    ///
    /// The build script runs the same checks on `station.toml`, so a
    /// firmware image never boots with parameters that fail here.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.min_heat >= self.max_heat {
            return Err(ParamsError::HeatRange);
        }
        if self.min_adc_rt >= self.max_adc_rt {
            return Err(ParamsError::AdcRange);
        }
        if self.short_circuit_below >= self.open_circuit_above {
            return Err(ParamsError::FaultThresholds);
        }
        if self.short_press_ms >= self.long_press_ms {
            return Err(ParamsError::PressTiming);
        }
        if self.fast_increment == 0 || self.sleep_blink_period == 0 || self.heat_blink_period == 0
        {
            return Err(ParamsError::ZeroPeriod);
        }

        let heat_point = self.default_config.heat_point;
        if heat_point < self.min_heat || heat_point > self.max_heat {
            return Err(ParamsError::DefaultHeatPoint);
        }
        if self.default_config.deep_sleep_timeout_ms <= self.default_config.sleep_timeout_ms {
            return Err(ParamsError::SleepOrdering);
        }

        Ok(())
    }

    /// Clamp a setpoint into `min_heat..=max_heat`
    pub fn clamp_heat_point(&self, value: i32) -> u16 {
        value.clamp(i32::from(self.min_heat), i32::from(self.max_heat)) as u16
    }
}
