//! Publication of load readings
//!
//! Binding averages to telemetry sinks is a composition decision made at the
//! boundary: a publisher holds zero to three sinks, one per window, and on
//! each polling tick forwards the percent reading of every window that has
//! one. Reading never mutates the estimator.

use libm::{powf, roundf};

use super::estimator::LoadEstimator;
use super::types::{LoadWindow, WINDOW_COUNT};

/// Consumer of percent readings (display, network reporting, logging)
pub trait LoadSink {
    /// Accept a new reading in percent (0-100)
    fn publish(&mut self, percent: f32);
}

impl<F: FnMut(f32)> LoadSink for F {
    fn publish(&mut self, percent: f32) {
        self(percent)
    }
}

/// Presentation metadata for a published load sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSchema {
    /// Unit of measurement
    pub unit: &'static str,
    /// Icon hint
    pub icon: &'static str,
    /// Decimal digits shown to consumers
    pub accuracy_decimals: u8,
    /// State class
    pub state_class: &'static str,
    /// Entity category
    pub entity_category: &'static str,
}

impl SensorSchema {
    /// Schema shared by all load sensors
    pub const LOAD: SensorSchema = SensorSchema {
        unit: "%",
        icon: "mdi:chip",
        accuracy_decimals: 1,
        state_class: "measurement",
        entity_category: "diagnostic",
    };

    /// Round a reading to the schema's precision
    pub fn round_to_accuracy(&self, value: f32) -> f32 {
        let scale = powf(10.0, self.accuracy_decimals as f32);
        roundf(value * scale) / scale
    }
}

/// Optional sink per averaging window
pub struct LoadPublisher<S: LoadSink> {
    sinks: [Option<S>; WINDOW_COUNT],
}

impl<S: LoadSink> LoadPublisher<S> {
    /// Create a publisher with no sinks
    pub fn new() -> Self {
        Self {
            sinks: [None, None, None],
        }
    }

    /// Builder-style sink binding
    pub fn with_sink(mut self, window: LoadWindow, sink: S) -> Self {
        self.set_sink(window, sink);
        self
    }

    /// Bind a sink to a window, replacing any previous one
    pub fn set_sink(&mut self, window: LoadWindow, sink: S) {
        self.sinks[window.index()] = Some(sink);
    }

    /// Check if a window has a sink
    pub fn has_sink(&self, window: LoadWindow) -> bool {
        self.sinks[window.index()].is_some()
    }

    /// Sink bound to a window
    pub fn sink(&self, window: LoadWindow) -> Option<&S> {
        self.sinks[window.index()].as_ref()
    }

    /// Number of bound sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.iter().filter(|s| s.is_some()).count()
    }

    /// Forward the current reading of every bound window
    ///
    /// # Returns
    ///
    /// Number of sinks that received a value
    pub fn publish(&mut self, estimator: &LoadEstimator) -> usize {
        let mut published = 0;
        for window in LoadWindow::ALL {
            if let Some(sink) = self.sinks[window.index()].as_mut() {
                sink.publish(estimator.read_percent(window));
                published += 1;
            }
        }
        published
    }
}

impl<S: LoadSink> Default for LoadPublisher<S> {
    fn default() -> Self {
        Self::new()
    }
}
