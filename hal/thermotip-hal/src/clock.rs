//! Monotonic millisecond clock
//!
//! A timer interrupt (or tick task) is the single producer; the control
//! loop and drivers are readers. On targets without native 32-bit atomics
//! `portable-atomic` falls back to a critical section, so a read can never
//! observe a torn counter.

use portable_atomic::{AtomicU32, Ordering};

/// Source of "now" in milliseconds
///
/// The counter wraps after ~49.7 days. Consumers compare timestamps with
/// `wrapping_sub`, never with `<` on absolute values.
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u32;
}

/// Atomic millisecond counter advanced by a periodic tick
pub struct MillisCounter {
    millis: AtomicU32,
}

impl Default for MillisCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl MillisCounter {
    /// Create a counter starting at zero
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
        }
    }

    /// Advance the counter by `delta_ms`
    ///
    /// Call from the tick source only.
    pub fn advance(&self, delta_ms: u32) {
        self.millis.fetch_add(delta_ms, Ordering::Relaxed);
    }

    /// Advance the counter by one millisecond
    pub fn tick(&self) {
        self.advance(1);
    }
}

impl Clock for MillisCounter {
    fn now_ms(&self) -> u32 {
        self.millis.load(Ordering::Relaxed)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
