//! load_sensor_core - Pure no_std host load estimation
//!
//! This crate contains the platform-agnostic load estimator and its
//! configuration types, testable on host without any feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Trait abstractions**: Time and publication injected via traits
//!
//! # Modules
//!
//! - [`load`]: Sampler, averager, estimator and publication
//! - [`parameters`]: Parameter store and the load parameter block
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)

#![no_std]

pub mod load;
pub mod parameters;
pub mod traits;
