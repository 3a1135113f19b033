//! Thermotip Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the regulation
//! core needs from a board. Chip-specific code (the firmware crate)
//! implements them; host tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  thermotip-firmware (board wiring)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermotip-core (control loop)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermotip-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital inputs (buttons, presence sensor)
//! - [`storage::ConfigStore`] - Persistent configuration record
//! - [`clock::Clock`] - Monotonic millisecond time

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use clock::{Clock, MillisCounter};
pub use gpio::{ActiveLowButton, InputPin};
pub use storage::{ConfigStore, StorageError, StorageKey};
