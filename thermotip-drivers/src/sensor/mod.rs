//! Analog input adapters

pub mod scaled;

pub use scaled::ScaledAdc;
