//! Load estimator
//!
//! Composes one [`LoopSampler`] and one [`LoadAverager`]. Every loop pass
//! folds a sample into all three averages; readings are only taken when the
//! polling interval elapses.

use super::averager::{clamp_ratio, LoadAverager};
use super::sampler::LoopSampler;
use super::types::{LoadConfig, LoadReadings, LoadWindow, TimingSource};

/// Host load estimator
///
/// One instance per configured device feature, constructed at startup and
/// kept for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct LoadEstimator {
    sampler: LoopSampler,
    averager: LoadAverager,
    sample_count: u64,
}

impl LoadEstimator {
    /// Create an estimator from configuration
    pub fn new(config: &LoadConfig) -> Self {
        Self {
            sampler: LoopSampler::new(
                config.baseline_loop_us,
                config.max_loop_us,
                config.timing_source,
            ),
            averager: LoadAverager::new(config.sample_interval_s(), config.window_lengths_s),
            sample_count: 0,
        }
    }

    /// Record one pass of the execution loop
    ///
    /// # Returns
    ///
    /// The utilization ratio folded into the averages, or `None` on the
    /// first pass and when utilization comes from run-time counters
    pub fn on_loop_pass(&mut self, now_us: u64) -> Option<f32> {
        if !self.timing_source().samples_loop_passes() {
            return None;
        }
        let ratio = self.sampler.on_loop_pass(now_us)?;
        self.fold(ratio);
        Some(ratio)
    }

    /// Store a loop duration (microseconds) from the external timing source
    pub fn on_external_duration(&mut self, duration_us: i64) -> bool {
        self.sampler.on_external_duration(duration_us)
    }

    /// Store a loop duration (milliseconds) from the external timing source
    pub fn on_external_duration_ms(&mut self, duration_ms: f32) -> bool {
        self.sampler.on_external_duration_ms(duration_ms)
    }

    /// Fold an already-computed utilization ratio into the averages
    ///
    /// Used by sources that measure utilization directly (e.g. task
    /// run-time counters) instead of loop durations. The configured sample
    /// interval must match how often this is called.
    pub fn on_utilization(&mut self, ratio: f32) {
        self.fold(clamp_ratio(ratio));
    }

    #[inline]
    fn fold(&mut self, ratio: f32) {
        self.averager.update(ratio);
        self.sample_count = self.sample_count.saturating_add(1);
    }

    /// Current load for a window in percent (0-100)
    #[inline]
    pub fn read_percent(&self, window: LoadWindow) -> f32 {
        self.averager.read_percent(window)
    }

    /// Percent snapshot of all windows
    pub fn readings(&self) -> LoadReadings {
        LoadReadings {
            load_1m: self.read_percent(LoadWindow::OneMinute),
            load_5m: self.read_percent(LoadWindow::FiveMinutes),
            load_15m: self.read_percent(LoadWindow::FifteenMinutes),
        }
    }

    /// Number of samples folded in since construction or reset
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Configured timing source
    pub fn timing_source(&self) -> TimingSource {
        self.sampler.timing_source()
    }

    /// Underlying averager
    pub fn averager(&self) -> &LoadAverager {
        &self.averager
    }

    /// Return to the boot state (idle, no previous pass)
    pub fn reset(&mut self) {
        self.sampler.reset();
        self.averager.reset();
        self.sample_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::expf;

    const EPS: f32 = 1e-5;

    /// baseline=10ms, max=110ms, window=1 unit, interval=1 unit
    fn synthetic(timing_source: TimingSource) -> LoadEstimator {
        LoadEstimator::new(&LoadConfig {
            baseline_loop_us: 10_000,
            max_loop_us: 110_000,
            sample_interval_us: Some(1_000_000),
            window_lengths_s: [1.0, 1.0, 1.0],
            timing_source,
        })
    }

    #[test]
    fn test_first_pass_leaves_averages_idle() {
        let mut estimator = synthetic(TimingSource::SelfTimed);
        assert_eq!(estimator.on_loop_pass(123_456), None);
        assert_eq!(estimator.readings(), LoadReadings::default());
        assert_eq!(estimator.sample_count(), 0);
    }

    #[test]
    fn test_end_to_end_half_load() {
        let mut estimator = synthetic(TimingSource::SelfTimed);
        estimator.on_loop_pass(0);
        let ratio = estimator.on_loop_pass(60_000).unwrap();
        assert!((ratio - 0.5).abs() < EPS);

        let decay = estimator.averager().decay_factor(LoadWindow::OneMinute);
        assert!((decay - expf(-1.0)).abs() < EPS);

        let expected = decay * 0.0 + (1.0 - decay) * 0.5;
        let value = estimator.averager().value(LoadWindow::OneMinute);
        assert!(
            (value - expected).abs() < EPS,
            "Expected {}, got {}",
            expected,
            value
        );
        assert_eq!(estimator.sample_count(), 1);
    }

    #[test]
    fn test_stall_saturates_and_approaches_100() {
        let mut estimator = synthetic(TimingSource::SelfTimed);
        let mut now = 0u64;
        estimator.on_loop_pass(now);

        for _ in 0..100 {
            now += 10_000_000; // 10s stall per pass
            assert_eq!(estimator.on_loop_pass(now), Some(1.0));
            let percent = estimator.read_percent(LoadWindow::OneMinute);
            assert!(percent <= 100.0, "percent {} exceeded 100", percent);
        }
        assert!(estimator.read_percent(LoadWindow::OneMinute) > 99.9);
    }

    #[test]
    fn test_external_duration_consumed_once() {
        let mut estimator = synthetic(TimingSource::External);
        estimator.on_loop_pass(0);

        assert!(estimator.on_external_duration(110_000));
        assert_eq!(estimator.on_loop_pass(10_000), Some(1.0));

        // Self-timed fallback: 10ms delta == baseline
        assert_eq!(estimator.on_loop_pass(20_000), Some(0.0));
    }

    #[test]
    fn test_on_utilization_clamps() {
        let mut estimator = synthetic(TimingSource::SelfTimed);
        estimator.on_utilization(7.0);
        let expected = (1.0 - expf(-1.0)) * 100.0;
        assert!((estimator.read_percent(LoadWindow::FiveMinutes) - expected).abs() < 1e-3);
        assert_eq!(estimator.sample_count(), 1);
    }

    #[test]
    fn test_runtime_stats_source_ignores_loop_passes() {
        let mut estimator = synthetic(TimingSource::RuntimeStats);
        assert_eq!(estimator.on_loop_pass(0), None);
        assert_eq!(estimator.on_loop_pass(200_000), None);
        assert!(!estimator.on_external_duration(110_000));
        assert_eq!(estimator.sample_count(), 0);

        estimator.on_utilization(1.0);
        assert_eq!(estimator.sample_count(), 1);
    }

    #[test]
    fn test_reset_returns_to_boot_state() {
        let mut estimator = synthetic(TimingSource::SelfTimed);
        estimator.on_loop_pass(0);
        estimator.on_loop_pass(100_000);
        estimator.reset();

        assert_eq!(estimator.readings(), LoadReadings::default());
        assert_eq!(estimator.sample_count(), 0);
        assert_eq!(estimator.on_loop_pass(200_000), None);
    }

    #[test]
    fn test_default_config_idle_device_reads_zero() {
        let mut estimator = LoadEstimator::new(&LoadConfig::default());
        let mut now = 0u64;
        for _ in 0..1_000 {
            estimator.on_loop_pass(now);
            now += 16_000;
        }
        assert_eq!(estimator.readings(), LoadReadings::default());
    }
}
