//! Core types for load estimation
//!
//! This module defines the fundamental types shared by the sampler,
//! averager and estimator:
//! - Averaging windows (1/5/15-minute analogues)
//! - Timing source capability
//! - Already-validated estimator configuration

/// Default duration of an idle loop pass in microseconds (0% load)
pub const DEFAULT_BASELINE_LOOP_US: u32 = 16_000;

/// Default loop pass duration in microseconds that saturates at 100% load
pub const DEFAULT_MAX_LOOP_US: u32 = 200_000;

/// Number of averaging windows maintained by the estimator
pub const WINDOW_COUNT: usize = 3;

/// Averaging window of a load reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadWindow {
    /// Short window (1-minute analogue)
    OneMinute,
    /// Medium window (5-minute analogue)
    FiveMinutes,
    /// Long window (15-minute analogue)
    FifteenMinutes,
}

impl LoadWindow {
    /// All windows in storage order
    pub const ALL: [LoadWindow; WINDOW_COUNT] = [
        LoadWindow::OneMinute,
        LoadWindow::FiveMinutes,
        LoadWindow::FifteenMinutes,
    ];

    /// Storage index of this window
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            LoadWindow::OneMinute => 0,
            LoadWindow::FiveMinutes => 1,
            LoadWindow::FifteenMinutes => 2,
        }
    }

    /// Default window length in seconds
    #[inline]
    pub const fn default_length_s(self) -> f32 {
        match self {
            LoadWindow::OneMinute => 60.0,
            LoadWindow::FiveMinutes => 300.0,
            LoadWindow::FifteenMinutes => 900.0,
        }
    }

    /// Configuration/telemetry key of the sensor publishing this window
    pub const fn key(self) -> &'static str {
        match self {
            LoadWindow::OneMinute => "load_1m",
            LoadWindow::FiveMinutes => "load_5m",
            LoadWindow::FifteenMinutes => "load_15m",
        }
    }
}

/// Where utilization samples come from
///
/// Selected once at construction. On device variants with a fine-grained
/// debug timer the durations are pushed from outside; on platforms with an
/// RTOS underneath the loop the task run-time counters are read once per
/// polling tick; everywhere else the sampler times itself from consecutive
/// loop pass timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingSource {
    /// Loop duration is the delta between consecutive loop passes
    #[default]
    SelfTimed,
    /// Loop duration is supplied by an external timing collaborator,
    /// falling back to the self-timed delta when no fresh sample is pending
    External,
    /// Utilization comes from task run-time counters; loop passes are not
    /// sampled
    RuntimeStats,
}

impl TimingSource {
    /// Parameter store encoding
    pub const fn to_param(self) -> i32 {
        match self {
            TimingSource::SelfTimed => 0,
            TimingSource::External => 1,
            TimingSource::RuntimeStats => 2,
        }
    }

    /// Decode a parameter store value
    pub const fn from_param(value: i32) -> Option<Self> {
        match value {
            0 => Some(TimingSource::SelfTimed),
            1 => Some(TimingSource::External),
            2 => Some(TimingSource::RuntimeStats),
            _ => None,
        }
    }

    /// Check if loop passes produce samples
    #[inline]
    pub const fn samples_loop_passes(self) -> bool {
        !matches!(self, TimingSource::RuntimeStats)
    }
}

/// Estimator configuration
///
/// Values are already typed and validated by the parameter layer; the
/// estimator never rejects a configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadConfig {
    /// Loop pass duration representing 0% load (microseconds)
    pub baseline_loop_us: u32,

    /// Loop pass duration representing 100% load (microseconds)
    pub max_loop_us: u32,

    /// Expected interval between samples (microseconds)
    ///
    /// Only used to derive decay factors. `None` uses the baseline loop
    /// duration, since an idle device passes through the loop at that rate.
    /// Run-time counter sources sample once per polling tick and must set it.
    pub sample_interval_us: Option<u32>,

    /// Window lengths in seconds, indexed by [`LoadWindow::index`]
    pub window_lengths_s: [f32; WINDOW_COUNT],

    /// Loop duration source
    pub timing_source: TimingSource,
}

impl LoadConfig {
    /// Effective sampling interval in seconds
    pub fn sample_interval_s(&self) -> f32 {
        let us = match self.sample_interval_us {
            Some(us) if us > 0 => us,
            _ => self.baseline_loop_us,
        };
        us as f32 / 1_000_000.0
    }

    /// Check if the 0%/100% endpoints are ordered
    #[inline]
    pub const fn has_valid_range(&self) -> bool {
        self.max_loop_us > self.baseline_loop_us
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            baseline_loop_us: DEFAULT_BASELINE_LOOP_US,
            max_loop_us: DEFAULT_MAX_LOOP_US,
            sample_interval_us: None,
            window_lengths_s: [
                LoadWindow::OneMinute.default_length_s(),
                LoadWindow::FiveMinutes.default_length_s(),
                LoadWindow::FifteenMinutes.default_length_s(),
            ],
            timing_source: TimingSource::SelfTimed,
        }
    }
}

/// Percent snapshot of all three averages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadReadings {
    /// 1-minute load (0-100%)
    pub load_1m: f32,
    /// 5-minute load (0-100%)
    pub load_5m: f32,
    /// 15-minute load (0-100%)
    pub load_15m: f32,
}

impl LoadReadings {
    /// Reading for a single window
    pub fn get(&self, window: LoadWindow) -> f32 {
        match window {
            LoadWindow::OneMinute => self.load_1m,
            LoadWindow::FiveMinutes => self.load_5m,
            LoadWindow::FifteenMinutes => self.load_15m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_indices_match_storage_order() {
        for (i, window) in LoadWindow::ALL.iter().enumerate() {
            assert_eq!(window.index(), i);
        }
    }

    #[test]
    fn test_window_keys() {
        assert_eq!(LoadWindow::OneMinute.key(), "load_1m");
        assert_eq!(LoadWindow::FiveMinutes.key(), "load_5m");
        assert_eq!(LoadWindow::FifteenMinutes.key(), "load_15m");
    }

    #[test]
    fn test_default_config() {
        let config = LoadConfig::default();
        assert_eq!(config.baseline_loop_us, 16_000);
        assert_eq!(config.max_loop_us, 200_000);
        assert_eq!(config.window_lengths_s, [60.0, 300.0, 900.0]);
        assert_eq!(config.timing_source, TimingSource::SelfTimed);
        assert!(config.has_valid_range());
    }

    #[test]
    fn test_sample_interval_defaults_to_baseline() {
        let config = LoadConfig::default();
        assert!((config.sample_interval_s() - 0.016).abs() < 1e-6);

        let config = LoadConfig {
            sample_interval_us: Some(1_000_000),
            ..Default::default()
        };
        assert!((config.sample_interval_s() - 1.0).abs() < 1e-6);

        // Zero falls back to baseline
        let config = LoadConfig {
            sample_interval_us: Some(0),
            ..Default::default()
        };
        assert!((config.sample_interval_s() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_timing_source_param_encoding() {
        for source in [
            TimingSource::SelfTimed,
            TimingSource::External,
            TimingSource::RuntimeStats,
        ] {
            assert_eq!(TimingSource::from_param(source.to_param()), Some(source));
        }
        assert_eq!(TimingSource::from_param(7), None);
        assert!(!TimingSource::RuntimeStats.samples_loop_passes());
        assert!(TimingSource::External.samples_loop_passes());
    }

    #[test]
    fn test_invalid_range_detected() {
        let config = LoadConfig {
            baseline_loop_us: 50_000,
            max_loop_us: 50_000,
            ..Default::default()
        };
        assert!(!config.has_valid_range());
    }

    #[test]
    fn test_readings_get() {
        let readings = LoadReadings {
            load_1m: 1.0,
            load_5m: 5.0,
            load_15m: 15.0,
        };
        assert_eq!(readings.get(LoadWindow::OneMinute), 1.0);
        assert_eq!(readings.get(LoadWindow::FiveMinutes), 5.0);
        assert_eq!(readings.get(LoadWindow::FifteenMinutes), 15.0);
    }
}
