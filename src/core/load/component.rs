//! Load sensor component
//!
//! Composes the estimator with its configuration and publish sinks, and
//! exposes the two entry points the firmware's scheduler drives:
//!
//! - [`LoadSensorComponent::loop_hook`] on every pass of the execution loop
//! - [`LoadSensorComponent::update`] every `LOAD_INTERVAL` milliseconds

use load_sensor_core::load::{
    LoadEstimator, LoadPublisher, LoadReadings, LoadSink, LoadWindow, RuntimeStatsSampler,
    SensorSchema, TimingSource,
};
use load_sensor_core::parameters::{LoadParams, ParameterError, ParameterStore};

use crate::core::traits::TimeSource;

/// 1-minute load warning threshold (percentage)
const HIGH_LOAD_WARNING_PERCENT: f32 = 75.0;

/// Load sensor bound to up to three publish sinks
pub struct LoadSensorComponent<S: LoadSink> {
    params: LoadParams,
    estimator: LoadEstimator,
    publisher: LoadPublisher<S>,
    runtime_stats: RuntimeStatsSampler,
}

impl<S: LoadSink> LoadSensorComponent<S> {
    /// Create a component from parameters, with no sinks bound
    pub fn new(params: LoadParams) -> Self {
        let estimator = LoadEstimator::new(&params.to_config());
        Self {
            params,
            estimator,
            publisher: LoadPublisher::new(),
            runtime_stats: RuntimeStatsSampler::new(),
        }
    }

    /// Create a component from the parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self::new(LoadParams::from_store(store))
    }

    /// Bind a publish sink to a window
    ///
    /// # Returns
    ///
    /// false if the window is disabled by `LOAD_*_EN`; the sink is dropped
    pub fn bind_sink(&mut self, window: LoadWindow, sink: S) -> bool {
        if !self.params.is_enabled(window) {
            crate::log_debug!("Load sensor: {} disabled, sink not bound", window.key());
            return false;
        }
        self.publisher.set_sink(window, sink);
        true
    }

    /// Prepare for the first loop pass
    ///
    /// Invalid parameters are reported but not rejected; the estimator
    /// clamps whatever it is given.
    #[allow(unused_variables)]
    pub fn setup(&mut self) -> Result<(), ParameterError> {
        self.estimator.reset();
        self.runtime_stats.reset();

        crate::log_info!(
            "Load sensor: interval={}ms baseline={}ms max={}ms sinks={}",
            self.params.update_interval_ms,
            self.params.baseline_loop_ms,
            self.params.max_loop_ms,
            self.publisher.sink_count()
        );

        let result = self.params.validate();
        if let Err(ParameterError::OutOfRange { name }) = result {
            crate::log_warn!("Load sensor: parameter {} out of range", name);
        }
        result
    }

    /// Per-iteration hook, called once per pass of the execution loop
    ///
    /// # Returns
    ///
    /// Utilization ratio of this pass, `None` on the first pass
    pub fn loop_hook(&mut self, now_us: u64) -> Option<f32> {
        self.estimator.on_loop_pass(now_us)
    }

    /// Per-iteration hook reading the current time from a time source
    pub fn loop_hook_with<T: TimeSource>(&mut self, time: &T) -> Option<f32> {
        self.loop_hook(time.now_us())
    }

    /// Fresh reading from the external loop-time sensor (milliseconds)
    pub fn on_loop_time_ms(&mut self, loop_time_ms: f32) {
        if !self.estimator.on_external_duration_ms(loop_time_ms) {
            crate::log_trace!(
                "Load sensor: external loop time {}ms ignored",
                loop_time_ms
            );
        }
    }

    /// Fresh task run-time stats table from the RTOS, once per polling tick
    ///
    /// # Returns
    ///
    /// Utilization folded into the averages, `None` when the snapshot only
    /// primed the sampler or the component is not fed by run-time counters
    pub fn on_runtime_stats(&mut self, table: &str) -> Option<f32> {
        if self.estimator.timing_source() != TimingSource::RuntimeStats {
            crate::log_trace!("Load sensor: run-time stats ignored");
            return None;
        }
        let ratio = self.runtime_stats.sample_text(table)?;
        self.estimator.on_utilization(ratio);
        Some(ratio)
    }

    /// Polling tick: report and publish the current averages
    #[allow(unused_variables)]
    pub fn update(&mut self) -> LoadReadings {
        let readings = self.estimator.readings();
        let schema = SensorSchema::LOAD;

        crate::log_debug!(
            "Load averages: {}% (1m), {}% (5m), {}% (15m)",
            schema.round_to_accuracy(readings.load_1m),
            schema.round_to_accuracy(readings.load_5m),
            schema.round_to_accuracy(readings.load_15m)
        );

        if readings.load_1m >= HIGH_LOAD_WARNING_PERCENT {
            crate::log_warn!(
                "High load: {}% (1m)",
                schema.round_to_accuracy(readings.load_1m)
            );
        }

        self.publisher.publish(&self.estimator);
        readings
    }

    /// Polling interval in milliseconds
    pub fn update_interval_ms(&self) -> u32 {
        self.params.update_interval_ms
    }

    /// Active parameters
    pub fn params(&self) -> &LoadParams {
        &self.params
    }

    /// Underlying estimator
    pub fn estimator(&self) -> &LoadEstimator {
        &self.estimator
    }

    /// Bound sinks
    pub fn publisher(&self) -> &LoadPublisher<S> {
        &self.publisher
    }
}
