//! ADC noise filter
//!
//! One-pole exponential moving average: each new sample contributes a
//! quarter, the previous output three quarters. Integer only, truncating.

/// One filter step: `(3 * previous + sample) / 4`
#[inline]
pub const fn smooth(previous: u16, sample: u16) -> u16 {
    // The result never exceeds max(previous, sample), so it fits in u16.
    ((previous as u32 * 3 + sample as u32) / 4) as u16
}

/// Exponential filter for one ADC channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExpFilter {
    value: u16,
}

impl ExpFilter {
    /// Create a filter whose history starts at zero
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Create a filter with a known starting value
    pub const fn with_initial(value: u16) -> Self {
        Self { value }
    }

    /// Feed a raw sample and return the new filtered value
    pub fn update(&mut self, sample: u16) -> u16 {
        self.value = smooth(self.value, sample);
        self.value
    }

    /// Last filtered value
    pub const fn value(&self) -> u16 {
        self.value
    }
}
