//! Persistent storage abstractions
//!
//! The station keeps a single small record (the user's setpoint and sleep
//! timeouts) in non-volatile memory. Boards back it with on-chip EEPROM or
//! a reserved flash sector.

/// Storage keys for persisted records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Station configuration record (binary postcard format)
    StationConfig = 0,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::StationConfig),
            _ => None,
        }
    }
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Underlying device (flash/EEPROM) operation failed
    Device,
    /// Key not found, or storage never written
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
}

/// Blocking record storage
///
/// The control loop calls [`ConfigStore::load`] once at boot and
/// [`ConfigStore::store`] only from its write-coalescing path, so
/// implementations may block for the duration of an erase/program cycle.
pub trait ConfigStore {
    /// Read a record into `buffer`, returning the number of bytes read
    fn load(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError>;

    /// Replace the record stored under `key`
    fn store(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &mut T {
    fn load(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        (**self).load(key, buffer)
    }

    fn store(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        (**self).store(key, data)
    }
}

// Flash-backed stores on the firmware side key their records through
// sequential-storage's map
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        let slot = buffer
            .first_mut()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        *slot = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let byte = buffer
            .first()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        StorageKey::from_u8(*byte)
            .map(|key| (key, 1))
            .ok_or(sequential_storage::map::SerializationError::InvalidFormat)
    }
}
