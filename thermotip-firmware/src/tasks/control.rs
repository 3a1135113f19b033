//! Station control task
//!
//! Runs the regulation loop once per millisecond and logs what changed.
//! Faults and sleep transitions are logged on the edge, not every
//! iteration.

use defmt::*;
use embassy_time::Timer;
use thermotip_core::config::ControlParams;
use thermotip_core::safety::SensorFault;
use thermotip_core::{ConfigSource, SaveOutcome, Station};
use thermotip_hal::Clock;

use crate::board::StationBoard;
use crate::tasks::CLOCK;

/// Loop pacing delay
const LOOP_DELAY_MS: u64 = 1;
/// How often the supply reading is logged
const POWER_LOG_INTERVAL_MS: u32 = 10_000;

/// Control task - boots the station and runs the loop forever
#[embassy_executor::task]
pub async fn control_task(params: ControlParams, mut board: StationBoard) {
    info!("Control task started");

    let (mut station, boot) = Station::boot(params, &mut board, CLOCK.now_ms());
    match boot.source {
        ConfigSource::Stored => info!("Settings loaded: {:?}", station.config()),
        ConfigSource::Clamped => warn!(
            "Stored setpoint out of range, clamped to {}",
            station.heat_point()
        ),
        ConfigSource::Defaults => {
            if let Some(e) = boot.load_error {
                warn!("No usable settings ({:?}), writing defaults", e);
            } else {
                info!("Blank settings, writing defaults");
            }
        }
    }
    if let Some(e) = boot.write_error {
        error!("Failed to write default settings: {:?}", e);
    }

    let mut last_fault: Option<SensorFault> = None;
    let mut last_power_log = CLOCK.now_ms();

    loop {
        let now = CLOCK.now_ms();
        let report = station.iterate(&mut board, now);

        if report.fault != last_fault {
            match report.fault {
                Some(fault) => error!(
                    "Sensor fault ER{} ({:?}), reading {}, heater off",
                    fault.code(),
                    fault,
                    report.reading
                ),
                None => info!("Sensor fault cleared, reading {}", report.reading),
            }
            last_fault = report.fault;
        }

        if report.sleep_changed {
            info!(
                "Sleep state {:?} at {}, tip {}",
                report.sleep, now, report.temperature
            );
        }

        match report.save {
            SaveOutcome::None => {}
            SaveOutcome::Saved => info!("Setpoint {} saved", report.heat_point),
            SaveOutcome::Failed(e) => error!("Failed to save setpoint: {:?}", e),
        }

        if now.wrapping_sub(last_power_log) >= POWER_LOG_INTERVAL_MS {
            debug!(
                "Supply {} tip {} duty {}%",
                station.power_input(),
                report.temperature,
                report.duty
            );
            last_power_log = now;
        }

        trace!("duty={} temp={}", report.duty, report.temperature);

        Timer::after_millis(LOOP_DELAY_MS).await;
    }
}
