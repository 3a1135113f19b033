//! Configuration types
//!
//! - [`record`]: the user's settings, stored as postcard binary data
//! - [`tuning`]: compile-time control-loop parameters

pub mod record;
pub mod tuning;

pub use record::*;
pub use tuning::*;
