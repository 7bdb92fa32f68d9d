//! Host load estimation
//!
//! Estimates how much of the device's time budget goes to non-idle work,
//! as 1/5/15-minute exponentially-weighted averages in percent.
//!
//! # Components
//!
//! - [`types`]: Windows, timing source and configuration
//! - [`sampler`]: Loop pass duration to utilization ratio
//! - [`averager`]: Three independent exponential moving averages
//! - [`estimator`]: Sampler and averager composed per device feature
//! - [`publish`]: Sink binding for polling-interval publication
//! - [`runtime_stats`]: Utilization from RTOS task run-time counters
//!
//! # Example
//!
//! ```rust
//! use load_sensor_core::load::{LoadConfig, LoadEstimator, LoadWindow};
//!
//! let mut estimator = LoadEstimator::new(&LoadConfig::default());
//!
//! // Called on every pass of the execution loop
//! estimator.on_loop_pass(0);
//! estimator.on_loop_pass(16_000);
//!
//! // Called when the polling interval elapses
//! let percent = estimator.read_percent(LoadWindow::OneMinute);
//! assert!((0.0..=100.0).contains(&percent));
//! ```

pub mod averager;
pub mod estimator;
pub mod publish;
pub mod runtime_stats;
pub mod sampler;
pub mod types;

pub use averager::{Average, LoadAverager};
pub use estimator::LoadEstimator;
pub use publish::{LoadPublisher, LoadSink, SensorSchema};
pub use runtime_stats::{parse_runtime_stats, RuntimeCounters, RuntimeStatsSampler};
pub use sampler::LoopSampler;
pub use types::*;
