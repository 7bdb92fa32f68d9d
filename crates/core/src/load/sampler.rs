//! Loop pass sampler
//!
//! Converts one observation per execution-loop pass into an instantaneous
//! utilization ratio in [0, 1]:
//!
//! ```text
//! ratio = clamp((duration - baseline) / (max - baseline), 0, 1)
//! ```
//!
//! The observed duration is either the delta between consecutive loop pass
//! timestamps or, when an external timing collaborator is wired, the most
//! recent duration it pushed. External samples are consumed once; a pass
//! without a fresh one falls back to the self-timed delta.

use super::types::TimingSource;

/// Minimum span between baseline and max loop durations (microseconds)
///
/// Substituted when `max <= baseline` so the ratio never divides by zero
/// or flips sign.
pub const MIN_LOOP_SPAN_US: i64 = 1;

/// Per-pass utilization sampler
#[derive(Debug, Clone, Copy)]
pub struct LoopSampler {
    baseline_loop_us: i64,
    max_loop_us: i64,
    timing_source: TimingSource,
    last_loop_us: Option<u64>,
    external_loop_us: Option<i64>,
}

impl LoopSampler {
    /// Create a sampler
    ///
    /// # Arguments
    ///
    /// * `baseline_loop_us` - Loop pass duration representing 0% load
    /// * `max_loop_us` - Loop pass duration representing 100% load
    /// * `timing_source` - Where loop durations come from
    pub fn new(baseline_loop_us: u32, max_loop_us: u32, timing_source: TimingSource) -> Self {
        Self {
            baseline_loop_us: baseline_loop_us as i64,
            max_loop_us: max_loop_us as i64,
            timing_source,
            last_loop_us: None,
            external_loop_us: None,
        }
    }

    /// Record one loop pass
    ///
    /// Returns the utilization ratio produced by this pass, or `None` on the
    /// first pass ever (no previous timestamp and no external sample).
    pub fn on_loop_pass(&mut self, now_us: u64) -> Option<f32> {
        let raw_us = match (self.external_loop_us.take(), self.last_loop_us) {
            (Some(external_us), _) => Some(external_us),
            (None, Some(last_us)) => Some(signed_delta_us(now_us, last_us)),
            (None, None) => None,
        };

        self.last_loop_us = Some(now_us);

        raw_us.map(|raw_us| self.ratio_for(raw_us))
    }

    /// Store a loop duration measured by an external timing collaborator
    ///
    /// Overwrites any unconsumed previous sample. Ignored unless the sampler
    /// is externally timed.
    ///
    /// # Returns
    ///
    /// true if the sample was stored
    pub fn on_external_duration(&mut self, duration_us: i64) -> bool {
        match self.timing_source {
            TimingSource::External => {
                self.external_loop_us = Some(duration_us);
                true
            }
            TimingSource::SelfTimed | TimingSource::RuntimeStats => false,
        }
    }

    /// Store an external loop duration reported in milliseconds
    ///
    /// Non-finite readings are dropped.
    pub fn on_external_duration_ms(&mut self, duration_ms: f32) -> bool {
        if !duration_ms.is_finite() {
            return false;
        }
        // `as` saturates on overflow
        self.on_external_duration((duration_ms * 1000.0) as i64)
    }

    /// Convert a raw loop duration into a ratio in [0, 1]
    pub fn ratio_for(&self, raw_us: i64) -> f32 {
        let span = self
            .max_loop_us
            .saturating_sub(self.baseline_loop_us)
            .max(MIN_LOOP_SPAN_US);
        let excess = raw_us.saturating_sub(self.baseline_loop_us);

        if excess <= 0 {
            return 0.0;
        }
        if excess >= span {
            return 1.0;
        }
        (excess as f32 / span as f32).clamp(0.0, 1.0)
    }

    /// Check if an external sample is waiting for the next pass
    pub fn has_pending_external(&self) -> bool {
        self.external_loop_us.is_some()
    }

    /// Timestamp of the previous loop pass
    pub fn last_loop_us(&self) -> Option<u64> {
        self.last_loop_us
    }

    /// Configured timing source
    pub fn timing_source(&self) -> TimingSource {
        self.timing_source
    }

    /// Forget previous timestamps and pending samples
    pub fn reset(&mut self) {
        self.last_loop_us = None;
        self.external_loop_us = None;
    }
}

/// Signed difference `now - last` in microseconds
///
/// A timestamp earlier than the previous one (clock irregularity) yields a
/// negative delta, which the ratio conversion clamps to idle.
#[inline]
fn signed_delta_us(now_us: u64, last_us: u64) -> i64 {
    if now_us >= last_us {
        i64::try_from(now_us - last_us).unwrap_or(i64::MAX)
    } else {
        i64::try_from(last_us - now_us).map_or(i64::MIN, |d| -d)
    }
}
