//! ADC resolution adapter
//!
//! The regulation thresholds and temperature calibration are expressed in
//! 10-bit counts. Boards with a wider converter wrap their ADC in
//! [`ScaledAdc`] so the loop sees the same scale everywhere.

use thermotip_core::traits::{AnalogSource, Channel};

/// Resolution the control loop is calibrated for
pub const LOOP_ADC_BITS: u8 = 10;

/// Rescales readings from a `bits`-wide converter to 10 bits
pub struct ScaledAdc<A> {
    adc: A,
    bits: u8,
}

impl<A: AnalogSource> ScaledAdc<A> {
    /// Wrap a converter with `bits` of resolution
    pub fn new(adc: A, bits: u8) -> Self {
        Self { adc, bits }
    }

    /// Release the converter
    pub fn into_inner(self) -> A {
        self.adc
    }
}

impl<A: AnalogSource> AnalogSource for ScaledAdc<A> {
    fn read_channel(&mut self, channel: Channel) -> u16 {
        let raw = self.adc.read_channel(channel);
        if self.bits >= LOOP_ADC_BITS {
            // Widths of 26 bits and more would overflow a plain shift
            raw.checked_shr(u32::from(self.bits - LOOP_ADC_BITS))
                .unwrap_or(0)
        } else {
            raw << (LOOP_ADC_BITS - self.bits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAdc {
        power: u16,
        temperature: u16,
    }

    impl AnalogSource for FixedAdc {
        fn read_channel(&mut self, channel: Channel) -> u16 {
            match channel {
                Channel::PowerInput => self.power,
                Channel::Temperature => self.temperature,
            }
        }
    }

    #[test]
    fn test_twelve_bit_to_ten() {
        let mut adc = ScaledAdc::new(
            FixedAdc {
                power: 4095,
                temperature: 340,
            },
            12,
        );
        assert_eq!(adc.read_channel(Channel::PowerInput), 1023);
        assert_eq!(adc.read_channel(Channel::Temperature), 85);
    }

    #[test]
    fn test_ten_bit_passthrough() {
        let mut adc = ScaledAdc::new(
            FixedAdc {
                power: 700,
                temperature: 85,
            },
            10,
        );
        assert_eq!(adc.read_channel(Channel::Temperature), 85);
        assert_eq!(adc.into_inner().power, 700);
    }

    #[test]
    fn test_eight_bit_widened() {
        let mut adc = ScaledAdc::new(
            FixedAdc {
                power: 0,
                temperature: 255,
            },
            8,
        );
        assert_eq!(adc.read_channel(Channel::Temperature), 1020);
    }

    #[test]
    fn test_oversized_width_reads_zero() {
        let mut adc = ScaledAdc::new(
            FixedAdc {
                power: u16::MAX,
                temperature: u16::MAX,
            },
            32,
        );
        assert_eq!(adc.read_channel(Channel::Temperature), 0);

        let mut adc = ScaledAdc::new(
            FixedAdc {
                power: u16::MAX,
                temperature: 0,
            },
            u8::MAX,
        );
        assert_eq!(adc.read_channel(Channel::PowerInput), 0);
    }
}
