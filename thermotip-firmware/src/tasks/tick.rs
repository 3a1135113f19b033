//! Millisecond tick task
//!
//! Sole writer of the station clock. The control loop reads it with a
//! single atomic load.

use defmt::*;
use embassy_time::{Duration, Ticker};
use thermotip_hal::MillisCounter;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u32 = 1;

/// Milliseconds since boot, wraps after ~49.7 days
pub static CLOCK: MillisCounter = MillisCounter::new();

/// Tick task - advances [`CLOCK`] every millisecond
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(TICK_INTERVAL_MS)));

    loop {
        ticker.next().await;
        CLOCK.advance(TICK_INTERVAL_MS);
    }
}
