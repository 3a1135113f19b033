//! Loop tuning generated from station.toml

use defmt::*;
use thermotip_core::config::{BlinkTiming, ControlParams, PersistedConfig, TimerSharing};

include!(concat!(env!("OUT_DIR"), "/tuning.rs"));

/// Tuning for this image, checked once at boot
///
/// build.rs already rejects inconsistent files, so the fallback only
/// guards against the two validators drifting apart.
pub fn control_params() -> ControlParams {
    match CONTROL_PARAMS.validate() {
        Ok(()) => CONTROL_PARAMS,
        Err(e) => {
            error!("Invalid built-in tuning ({:?}), using defaults", e);
            ControlParams::DEFAULT
        }
    }
}
