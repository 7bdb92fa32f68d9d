//! Exponentially-weighted load averages
//!
//! Three independent averages with distinct time constants, following the
//! classic Unix load-average smoothing:
//!
//! ```text
//! decay = exp(-sample_interval / window)
//! value = decay * value + (1 - decay) * sample
//! ```
//!
//! A sample's influence decays geometrically; after `window / sample_interval`
//! samples a step change has reached ~63% of its final value.

use libm::expf;

use super::types::{LoadWindow, WINDOW_COUNT};

/// Smallest decay factor (pass-through average)
const MIN_DECAY: f32 = f32::MIN_POSITIVE;

/// Largest decay factor (near-frozen average)
const MAX_DECAY: f32 = 1.0 - f32::EPSILON;

/// Derive a decay factor in (0, 1) from the sampling interval and window length
///
/// Degenerate inputs never escape the open interval: a non-positive window
/// yields a pass-through average, a non-positive interval a near-frozen one.
pub fn decay_factor(sample_interval_s: f32, window_s: f32) -> f32 {
    let decay = if window_s > 0.0 && sample_interval_s > 0.0 {
        expf(-sample_interval_s / window_s)
    } else if window_s > 0.0 {
        MAX_DECAY
    } else {
        MIN_DECAY
    };

    if decay.is_nan() {
        MAX_DECAY
    } else {
        decay.clamp(MIN_DECAY, MAX_DECAY)
    }
}

/// A single exponentially-weighted moving average of utilization ratios
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Average {
    /// Fixed at construction
    decay: f32,
    /// Running estimate in [0, 1]
    value: f32,
}

impl Average {
    /// Create an average starting idle (0)
    pub fn new(sample_interval_s: f32, window_s: f32) -> Self {
        Self::with_decay(decay_factor(sample_interval_s, window_s))
    }

    /// Create an average from an explicit decay factor
    ///
    /// The factor is clamped into (0, 1).
    pub fn with_decay(decay: f32) -> Self {
        let decay = if decay.is_nan() {
            MAX_DECAY
        } else {
            decay.clamp(MIN_DECAY, MAX_DECAY)
        };
        Self { decay, value: 0.0 }
    }

    /// Fold one ratio sample into the average
    #[inline]
    pub fn update(&mut self, ratio: f32) {
        let ratio = clamp_ratio(ratio);
        let prev = self.value;
        let next = self.decay * prev + (1.0 - self.decay) * ratio;

        // Rounding must keep the estimate between the previous value and the sample
        self.value = if ratio >= prev {
            next.clamp(prev, ratio)
        } else {
            next.clamp(ratio, prev)
        };
    }

    /// Current estimate in [0, 1]
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Decay factor in (0, 1)
    #[inline]
    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Return to idle, keeping the decay factor
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// Clamp a utilization ratio into [0, 1]; NaN counts as idle
#[inline]
pub fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Short/medium/long load averages updated from one ratio stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverager {
    averages: [Average; WINDOW_COUNT],
}

impl LoadAverager {
    /// Create the averager
    ///
    /// # Arguments
    ///
    /// * `sample_interval_s` - Expected time between `update` calls in seconds
    /// * `windows_s` - Window lengths in seconds, indexed by [`LoadWindow::index`]
    pub fn new(sample_interval_s: f32, windows_s: [f32; WINDOW_COUNT]) -> Self {
        Self {
            averages: windows_s.map(|window_s| Average::new(sample_interval_s, window_s)),
        }
    }

    /// Fold one ratio sample into every average
    ///
    /// O(1), allocation-free; called on every loop pass.
    #[inline]
    pub fn update(&mut self, ratio: f32) {
        for average in self.averages.iter_mut() {
            average.update(ratio);
        }
    }

    /// Current estimate for a window in [0, 1]
    #[inline]
    pub fn value(&self, window: LoadWindow) -> f32 {
        self.averages[window.index()].value()
    }

    /// Current estimate for a window in percent (0-100)
    #[inline]
    pub fn read_percent(&self, window: LoadWindow) -> f32 {
        self.value(window) * 100.0
    }

    /// Decay factor for a window
    pub fn decay_factor(&self, window: LoadWindow) -> f32 {
        self.averages[window.index()].decay()
    }

    /// Return all averages to idle
    pub fn reset(&mut self) {
        for average in self.averages.iter_mut() {
            average.reset();
        }
    }
}
