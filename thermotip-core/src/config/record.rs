//! Persisted station configuration
//!
//! The record is small and written rarely: once on first boot and then
//! only after the user stops editing the setpoint. It is stored as
//! postcard binary under [`StorageKey::StationConfig`].

use serde::{Deserialize, Serialize};
use thermotip_hal::{ConfigStore, StorageError, StorageKey};

/// Upper bound of the encoded record (varint u16 + two varint u32)
pub const RECORD_MAX_SIZE: usize = 16;

/// Errors loading or saving the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Storage operation failed
    Storage(StorageError),
    /// Serialization failed
    Encode,
    /// Stored bytes are not a valid record
    Decode,
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        ConfigError::Storage(e)
    }
}

/// User settings that survive power cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistedConfig {
    /// Target temperature (display units)
    pub heat_point: u16,
    /// Idle time before dropping to the sleep temperature
    pub sleep_timeout_ms: u32,
    /// Idle time before switching the heater off
    pub deep_sleep_timeout_ms: u32,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PersistedConfig {
    /// Factory settings: 270, 3 min to sleep, 10 min to deep sleep
    pub const DEFAULT: Self = Self::new(270, 180_000, 600_000);

    /// Create a record
    pub const fn new(heat_point: u16, sleep_timeout_ms: u32, deep_sleep_timeout_ms: u32) -> Self {
        Self {
            heat_point,
            sleep_timeout_ms,
            deep_sleep_timeout_ms,
        }
    }

    /// A zero setpoint only comes from storage that was never written
    pub const fn is_blank(&self) -> bool {
        self.heat_point == 0
    }

    /// Serialize into `buffer`, returning the used prefix
    pub fn encode<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a [u8], ConfigError> {
        let used: &'a [u8] = postcard::to_slice(self, buffer).map_err(|_| ConfigError::Encode)?;
        Ok(used)
    }

    /// Deserialize from stored bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)
    }

    /// Read the record from storage
    pub fn load<S: ConfigStore>(store: &mut S) -> Result<Self, ConfigError> {
        let mut buffer = [0u8; RECORD_MAX_SIZE];
        let len = store.load(StorageKey::StationConfig, &mut buffer)?;
        Self::decode(&buffer[..len])
    }

    /// Write the full record to storage
    pub fn save<S: ConfigStore>(&self, store: &mut S) -> Result<(), ConfigError> {
        let mut buffer = [0u8; RECORD_MAX_SIZE];
        let bytes = self.encode(&mut buffer)?;
        store.store(StorageKey::StationConfig, bytes)?;
        Ok(())
    }
}
