//! Load Sensor Parameter Definitions
//!
//! # Parameters
//!
//! - `LOAD_1M_EN` / `LOAD_5M_EN` / `LOAD_15M_EN` - Publish the 1/5/15-minute average
//! - `LOAD_INTERVAL` - Polling interval in milliseconds
//! - `LOAD_BASE_MS` - Loop pass duration representing 0% load
//! - `LOAD_MAX_MS` - Loop pass duration representing 100% load
//! - `LOAD_SAMPLE_MS` - Expected sampling interval (0 = derived from the timing source)
//! - `LOAD_TIMING` - Utilization source wired into this build (read-only):
//!   0 = self-timed loop passes, 1 = external debug timer, 2 = task run-time counters

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::load::{LoadConfig, LoadWindow, TimingSource, WINDOW_COUNT};

/// Default polling interval in milliseconds
const DEFAULT_INTERVAL_MS: u32 = 10_000;

/// Minimum polling interval in milliseconds
const MIN_INTERVAL_MS: u32 = 100;

/// Maximum polling interval in milliseconds (1 hour)
const MAX_INTERVAL_MS: u32 = 3_600_000;

/// Default baseline loop duration in milliseconds
const DEFAULT_BASELINE_MS: f32 = 16.0;

/// Default saturating loop duration in milliseconds
const DEFAULT_MAX_MS: f32 = 200.0;

/// Upper bound for loop duration settings in milliseconds
const MAX_LOOP_MS: f32 = 60_000.0;

const ENABLE_NAMES: [&str; WINDOW_COUNT] = ["LOAD_1M_EN", "LOAD_5M_EN", "LOAD_15M_EN"];

/// Load sensor parameters loaded from parameter store
#[derive(Debug, Clone, PartialEq)]
pub struct LoadParams {
    /// Publish flags indexed by [`LoadWindow::index`]
    pub enabled: [bool; WINDOW_COUNT],
    /// Polling interval in milliseconds
    pub update_interval_ms: u32,
    /// Baseline loop duration in milliseconds (0% load)
    pub baseline_loop_ms: f32,
    /// Saturating loop duration in milliseconds (100% load)
    pub max_loop_ms: f32,
    /// Expected sampling interval in milliseconds (0 = derived from the timing source)
    pub sample_interval_ms: f32,
    /// Utilization source wired into this build
    pub timing_source: TimingSource,
}

impl Default for LoadParams {
    fn default() -> Self {
        Self {
            enabled: [true; WINDOW_COUNT],
            update_interval_ms: DEFAULT_INTERVAL_MS,
            baseline_loop_ms: DEFAULT_BASELINE_MS,
            max_loop_ms: DEFAULT_MAX_MS,
            sample_interval_ms: 0.0,
            timing_source: TimingSource::SelfTimed,
        }
    }
}

impl LoadParams {
    /// Register load parameters with default values
    ///
    /// # Arguments
    ///
    /// * `store` - Parameter store to register parameters in
    /// * `timing_source` - Utilization source the firmware build wires up;
    ///   recorded read-only since it cannot change at run time
    pub fn register_defaults(
        store: &mut ParameterStore,
        timing_source: TimingSource,
    ) -> Result<(), ParameterError> {
        for name in ENABLE_NAMES {
            store.register(name, ParamValue::Bool(true), ParamFlags::empty())?;
        }

        store.register(
            "LOAD_INTERVAL",
            ParamValue::Int(DEFAULT_INTERVAL_MS as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "LOAD_BASE_MS",
            ParamValue::Float(DEFAULT_BASELINE_MS),
            ParamFlags::empty(),
        )?;
        store.register(
            "LOAD_MAX_MS",
            ParamValue::Float(DEFAULT_MAX_MS),
            ParamFlags::empty(),
        )?;
        store.register("LOAD_SAMPLE_MS", ParamValue::Float(0.0), ParamFlags::empty())?;

        store.register(
            "LOAD_TIMING",
            ParamValue::Int(timing_source.to_param()),
            ParamFlags::READ_ONLY,
        )?;

        Ok(())
    }

    /// Load parameters from parameter store
    ///
    /// Missing values fall back to defaults; numeric values are clamped to
    /// their valid ranges. The baseline/max ordering is not repaired here,
    /// see [`LoadParams::validate`].
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = Self::default();

        let mut enabled = defaults.enabled;
        for (flag, name) in enabled.iter_mut().zip(ENABLE_NAMES) {
            if let Some(v) = store.get(name) {
                *flag = v.as_bool();
            }
        }

        let update_interval_ms = match store.get("LOAD_INTERVAL") {
            Some(ParamValue::Int(v)) => {
                (*v).clamp(MIN_INTERVAL_MS as i32, MAX_INTERVAL_MS as i32) as u32
            }
            Some(ParamValue::Float(v)) if v.is_finite() => {
                v.clamp(MIN_INTERVAL_MS as f32, MAX_INTERVAL_MS as f32) as u32
            }
            _ => defaults.update_interval_ms,
        };

        let read_ms = |name: &str, default: f32| match store.get(name) {
            Some(v) if v.as_f32().is_finite() => v.as_f32().clamp(0.0, MAX_LOOP_MS),
            _ => default,
        };

        Self {
            enabled,
            update_interval_ms,
            baseline_loop_ms: read_ms("LOAD_BASE_MS", defaults.baseline_loop_ms),
            max_loop_ms: read_ms("LOAD_MAX_MS", defaults.max_loop_ms),
            sample_interval_ms: read_ms("LOAD_SAMPLE_MS", defaults.sample_interval_ms),
            timing_source: match store.get("LOAD_TIMING") {
                Some(ParamValue::Int(v)) => {
                    TimingSource::from_param(*v).unwrap_or(defaults.timing_source)
                }
                _ => defaults.timing_source,
            },
        }
    }

    /// Validate load parameters
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&self.update_interval_ms) {
            return Err(ParameterError::OutOfRange {
                name: "LOAD_INTERVAL",
            });
        }
        if !(0.0..=MAX_LOOP_MS).contains(&self.baseline_loop_ms) {
            return Err(ParameterError::OutOfRange {
                name: "LOAD_BASE_MS",
            });
        }
        if !(self.max_loop_ms > self.baseline_loop_ms && self.max_loop_ms <= MAX_LOOP_MS) {
            return Err(ParameterError::OutOfRange {
                name: "LOAD_MAX_MS",
            });
        }
        if !(0.0..=MAX_LOOP_MS).contains(&self.sample_interval_ms) {
            return Err(ParameterError::OutOfRange {
                name: "LOAD_SAMPLE_MS",
            });
        }
        Ok(())
    }

    /// Check if parameters are valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check if a window's average is published
    pub fn is_enabled(&self, window: LoadWindow) -> bool {
        self.enabled[window.index()]
    }

    /// Estimator configuration for these parameters
    ///
    /// Without an explicit `LOAD_SAMPLE_MS`, loop-pass sources sample at the
    /// baseline loop duration and run-time counters once per polling tick.
    pub fn to_config(&self) -> LoadConfig {
        let sample_interval_us = match ms_to_us(self.sample_interval_ms) {
            0 if self.timing_source == TimingSource::RuntimeStats => {
                Some(self.update_interval_ms.saturating_mul(1000))
            }
            0 => None,
            us => Some(us),
        };

        LoadConfig {
            baseline_loop_us: ms_to_us(self.baseline_loop_ms),
            max_loop_us: ms_to_us(self.max_loop_ms),
            sample_interval_us,
            timing_source: self.timing_source,
            ..LoadConfig::default()
        }
    }
}

/// Milliseconds to whole microseconds; negative and NaN map to 0
fn ms_to_us(ms: f32) -> u32 {
    // `as` saturates and maps NaN to 0
    (ms * 1000.0) as u32
}
