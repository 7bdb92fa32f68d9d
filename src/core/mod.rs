//! Core load sensor functionality
//!
//! Firmware-specific code (logging, shared-state traits, the component)
//! plus re-exports of the pure logic in `load_sensor_core`.

pub mod load;
pub mod logging;
pub mod traits;

pub use load_sensor_core::parameters;
