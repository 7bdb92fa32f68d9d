//! Load sensor component
//!
//! Firmware-facing wrapper around `load_sensor_core::load`: binds the
//! estimator to configuration, logging and publish sinks.

pub mod component;

pub use component::LoadSensorComponent;
