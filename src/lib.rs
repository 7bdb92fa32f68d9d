#![cfg_attr(not(test), no_std)]

//! load_sensor - Host load estimator for cooperative-scheduling firmware
//!
//! Samples how much of each execution-loop pass goes to non-idle work and
//! publishes 1/5/15-minute load averages in percent.
//!
//! The pure estimation logic lives in `load_sensor_core`; this crate adds
//! logging, shared-state access and the Embassy drivers.

// Core systems (component, logging, traits)
pub mod core;

// Executor glue (feature-gated)
pub mod platform;

// Note: Logging macros (log_info!, log_warn!, log_debug!, log_trace!)
// are exported at crate root via #[macro_export] in core::logging
