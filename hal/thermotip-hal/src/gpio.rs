//! GPIO pin abstractions
//!
//! Buttons and the handle's presence sensor are plain digital inputs.
//! Outputs (display multiplexer, buzzer) use `embedded-hal` directly in the
//! drivers crate.

/// Digital input pin
///
/// Takes `&mut self` because some HALs need mutable access to sample a pin.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &mut T {
    fn is_high(&mut self) -> bool {
        (**self).is_high()
    }
}

/// Push-button wired between the pin and ground with a pull-up
///
/// Reads as pressed while the pin is low.
pub struct ActiveLowButton<P> {
    pin: P,
}

impl<P: InputPin> ActiveLowButton<P> {
    /// Wrap an input pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Check if the button is held down
    pub fn is_pressed(&mut self) -> bool {
        self.pin.is_low()
    }

    /// Release the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}
