//! Buzzer trait

/// Piezo buzzer
///
/// Tones start immediately. Drivers that cannot block call back through
/// [`Buzzer::poll`] every iteration to end them.
pub trait Buzzer {
    /// Short click for button steps and faults
    fn beep(&mut self);

    /// Longer tone for boot and sleep transitions
    fn beep_alarm(&mut self);

    /// Advance any running tone
    fn poll(&mut self, _now_ms: u32) {}
}

impl<T: Buzzer + ?Sized> Buzzer for &mut T {
    fn beep(&mut self) {
        (**self).beep()
    }

    fn beep_alarm(&mut self) {
        (**self).beep_alarm()
    }

    fn poll(&mut self, now_ms: u32) {
        (**self).poll(now_ms)
    }
}
