//! PWM heater output
//!
//! Drives the heater MOSFET from any `embedded-hal` PWM channel. The
//! station's duty convention is "100 % = heater off", which matches a gate
//! driver that inverts. Boards with a non-inverting stage select
//! [`OutputPolarity::Direct`] and the duty is flipped before it reaches
//! the channel.

use embedded_hal::pwm::SetDutyCycle;
use thermotip_core::traits::HeaterDrive;

/// How the PWM output relates to heater power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputPolarity {
    /// Output high = heater off
    #[default]
    Inverted,
    /// Output high = heater on
    Direct,
}

/// Heater driven by a PWM channel
pub struct PwmHeater<P> {
    pwm: P,
    polarity: OutputPolarity,
    /// Last duty requested, in the station's convention
    duty: u8,
    /// The last channel write was rejected
    write_failed: bool,
}

impl<P: SetDutyCycle> PwmHeater<P> {
    /// Wrap a PWM channel; the heater starts off
    pub fn new(pwm: P, polarity: OutputPolarity) -> Self {
        let mut heater = Self {
            pwm,
            polarity,
            duty: 0,
            write_failed: false,
        };
        heater.set_duty_percent(100);
        heater
    }

    /// Last duty requested (100 = off)
    pub fn duty_percent(&self) -> u8 {
        self.duty
    }

    /// Check if the last channel write failed
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    /// Release the PWM channel
    pub fn into_inner(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> HeaterDrive for PwmHeater<P> {
    fn set_duty_percent(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.duty = percent;

        let output = match self.polarity {
            OutputPolarity::Inverted => percent,
            OutputPolarity::Direct => 100 - percent,
        };
        self.write_failed = self.pwm.set_duty_cycle_percent(output).is_err();
    }
}
