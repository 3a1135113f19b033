//! Analog input trait

/// ADC channels sampled every iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Supply voltage divider
    PowerInput,
    /// Tip thermocouple amplifier
    Temperature,
}

/// Source of raw ADC readings
///
/// Takes `&mut self` because ADC reads typically require mutable access.
/// Conversions are assumed to succeed; a dead sensor shows up as an
/// out-of-range reading, which the loop classifies as a fault.
pub trait AnalogSource {
    /// Read one raw sample from `channel`
    fn read_channel(&mut self, channel: Channel) -> u16;
}

impl<T: AnalogSource + ?Sized> AnalogSource for &mut T {
    fn read_channel(&mut self, channel: Channel) -> u16 {
        (**self).read_channel(channel)
    }
}
