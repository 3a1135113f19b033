//! Piezo buzzer on a GPIO pin
//!
//! Tones are requested from the control loop and started or ended on the
//! next [`Buzzer::poll`], so the loop never blocks on a tone. A longer tone
//! is never cut short by a shorter request.

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};
use thermotip_core::traits::Buzzer;

/// Short click length
pub const BEEP_MS: u32 = 10;
/// Alarm tone length
pub const ALARM_MS: u32 = 150;

/// Buzzer driven high for the duration of a tone
pub struct PinBuzzer<P> {
    pin: P,
    /// Longest tone requested since the last poll
    requested_ms: u32,
    /// End of the running tone
    until_ms: Option<u32>,
    beep_ms: u32,
    alarm_ms: u32,
}

impl<P: OutputPin<Error = Infallible>> PinBuzzer<P> {
    /// Wrap a pin with the default tone lengths
    pub fn new(pin: P) -> Self {
        Self::with_durations(pin, BEEP_MS, ALARM_MS)
    }

    /// Wrap a pin with custom tone lengths
    pub fn with_durations(pin: P, beep_ms: u32, alarm_ms: u32) -> Self {
        let mut buzzer = Self {
            pin,
            requested_ms: 0,
            until_ms: None,
            beep_ms,
            alarm_ms,
        };
        buzzer.drive(false);
        buzzer
    }

    /// Check if a tone is sounding
    pub fn is_sounding(&self) -> bool {
        self.until_ms.is_some()
    }

    fn request(&mut self, duration_ms: u32) {
        self.requested_ms = self.requested_ms.max(duration_ms);
    }

    fn drive(&mut self, on: bool) {
        match self.pin.set_state(PinState::from(on)) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl<P: OutputPin<Error = Infallible>> Buzzer for PinBuzzer<P> {
    fn beep(&mut self) {
        self.request(self.beep_ms);
    }

    fn beep_alarm(&mut self) {
        self.request(self.alarm_ms);
    }

    fn poll(&mut self, now_ms: u32) {
        if self.requested_ms > 0 {
            let end = now_ms.wrapping_add(self.requested_ms);
            self.requested_ms = 0;
            let extends = match self.until_ms {
                Some(until) => (end.wrapping_sub(until) as i32) > 0,
                None => true,
            };
            if extends {
                self.until_ms = Some(end);
            }
            self.drive(true);
            return;
        }

        if let Some(until) = self.until_ms {
            if (now_ms.wrapping_sub(until) as i32) >= 0 {
                self.until_ms = None;
                self.drive(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    fn buzzer() -> PinBuzzer<MockPin> {
        PinBuzzer::new(MockPin { high: true })
    }

    #[test]
    fn test_starts_silent() {
        let buzzer = buzzer();
        assert!(!buzzer.pin.high);
        assert!(!buzzer.is_sounding());
    }

    #[test]
    fn test_beep_length() {
        let mut buzzer = buzzer();
        buzzer.beep();
        buzzer.poll(100);
        assert!(buzzer.pin.high);

        buzzer.poll(109);
        assert!(buzzer.pin.high);
        buzzer.poll(110);
        assert!(!buzzer.pin.high);
        assert!(!buzzer.is_sounding());
    }

    #[test]
    fn test_beep_does_not_cut_alarm_short() {
        let mut buzzer = buzzer();
        buzzer.beep_alarm();
        buzzer.poll(0);

        buzzer.beep();
        buzzer.poll(50);
        buzzer.poll(60);
        assert!(buzzer.pin.high);

        buzzer.poll(150);
        assert!(!buzzer.pin.high);
    }

    #[test]
    fn test_repeated_beeps_keep_sounding() {
        let mut buzzer = buzzer();
        for now in 0..100 {
            buzzer.beep();
            buzzer.poll(now);
            assert!(buzzer.pin.high);
        }
        buzzer.poll(109);
        assert!(!buzzer.pin.high);
    }

    #[test]
    fn test_no_poll_no_tone() {
        let mut buzzer = buzzer();
        buzzer.beep();
        assert!(!buzzer.pin.high);
    }
}
