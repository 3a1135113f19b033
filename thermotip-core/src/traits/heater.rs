//! Heater output trait

/// PWM drive for the heater element
///
/// The duty is the raw PWM percentage. The station drives the heater
/// through an inverting stage, so 100 means off.
pub trait HeaterDrive {
    /// Apply a duty cycle in percent (0-100)
    fn set_duty_percent(&mut self, percent: u8);
}

impl<T: HeaterDrive + ?Sized> HeaterDrive for &mut T {
    fn set_duty_percent(&mut self, percent: u8) {
        (**self).set_duty_percent(percent)
    }
}
