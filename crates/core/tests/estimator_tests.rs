use load_sensor_core::load::{
    LoadConfig, LoadEstimator, LoadPublisher, LoadWindow, RuntimeCounters, RuntimeStatsSampler,
    SensorSchema, TimingSource,
};
use load_sensor_core::parameters::{LoadParams, ParamValue, ParameterStore};
use load_sensor_core::traits::{MockTime, TimeSource};

/// Drive `passes` loop passes of `pass_us` each
fn run_loop(estimator: &mut LoadEstimator, time: &MockTime, passes: u32, pass_us: u64) {
    for _ in 0..passes {
        time.advance(pass_us);
        estimator.on_loop_pass(time.now_us());
    }
}

#[test]
fn idle_then_busy_then_idle() {
    let config = LoadConfig {
        baseline_loop_us: 16_000,
        max_loop_us: 116_000,
        sample_interval_us: Some(16_000),
        window_lengths_s: [1.0, 5.0, 15.0],
        timing_source: TimingSource::SelfTimed,
    };
    let mut estimator = LoadEstimator::new(&config);
    let time = MockTime::new();
    estimator.on_loop_pass(time.now_us());

    run_loop(&mut estimator, &time, 500, 16_000);
    assert_eq!(estimator.read_percent(LoadWindow::OneMinute), 0.0);

    // 66ms passes: 50% load
    run_loop(&mut estimator, &time, 2_000, 66_000);
    let busy = estimator.readings();
    assert!((busy.load_1m - 50.0).abs() < 0.5, "1m load {}", busy.load_1m);
    assert!(busy.load_1m >= busy.load_5m);
    assert!(busy.load_5m >= busy.load_15m);

    run_loop(&mut estimator, &time, 500, 16_000);
    let idle = estimator.readings();
    assert!(idle.load_1m < busy.load_1m);
    // The long window forgets more slowly
    assert!(idle.load_15m > idle.load_1m);
}

#[test]
fn missed_samples_do_not_diverge() {
    let mut estimator = LoadEstimator::new(&LoadConfig::default());
    let time = MockTime::new();
    estimator.on_loop_pass(time.now_us());

    // Irregular ticks including a clock step backwards and a long stall
    for step in [16_000u64, 20_000, 4_000, 0, 2_000_000, 16_000] {
        time.advance(step);
        estimator.on_loop_pass(time.now_us());
    }
    time.set(1_000);
    estimator.on_loop_pass(time.now_us());

    for window in LoadWindow::ALL {
        let percent = estimator.read_percent(window);
        assert!((0.0..=100.0).contains(&percent), "{} out of range", percent);
    }
}

#[test]
fn external_timer_from_parameters() {
    let mut store = ParameterStore::new();
    LoadParams::register_defaults(&mut store, TimingSource::External).unwrap();
    store.set("LOAD_BASE_MS", ParamValue::Float(10.0)).unwrap();
    store.set("LOAD_MAX_MS", ParamValue::Float(110.0)).unwrap();
    store.set("LOAD_SAMPLE_MS", ParamValue::Float(1000.0)).unwrap();

    let params = LoadParams::from_store(&store);
    assert!(params.is_valid());

    let mut estimator = LoadEstimator::new(&params.to_config());
    assert_eq!(estimator.timing_source(), TimingSource::External);

    estimator.on_loop_pass(0);
    assert!(estimator.on_external_duration_ms(60.0));
    assert_eq!(estimator.on_loop_pass(1_000), Some(0.5));
    // Stale external sample not reused: 1ms delta is below baseline
    assert_eq!(estimator.on_loop_pass(2_000), Some(0.0));
}

#[test]
fn runtime_counters_step_response() {
    let mut store = ParameterStore::new();
    LoadParams::register_defaults(&mut store, TimingSource::RuntimeStats).unwrap();
    let params = LoadParams::from_store(&store);
    let mut estimator = LoadEstimator::new(&params.to_config());
    let mut sampler = RuntimeStatsSampler::new();

    let mut counters = RuntimeCounters {
        active_ticks: 0,
        idle_ticks: 50_000,
    };
    assert_eq!(sampler.sample(counters), None);

    // One minute fully busy, one snapshot per 10s polling tick
    let polls = 60_000 / params.update_interval_ms;
    for _ in 0..polls {
        counters.active_ticks += 10_000;
        let ratio = sampler.sample(counters).unwrap();
        estimator.on_utilization(ratio);
    }

    // One window of a 100% step: 1 - exp(-1)
    let readings = estimator.readings();
    assert!((readings.load_1m - 63.21).abs() < 0.1, "1m load {}", readings.load_1m);
    assert!(readings.load_5m > 15.0 && readings.load_5m < readings.load_1m);
    assert!(readings.load_15m > 5.0 && readings.load_15m < readings.load_5m);
}

#[test]
fn publish_rounded_percent() {
    let mut estimator = LoadEstimator::new(&LoadConfig {
        sample_interval_us: Some(1_000_000),
        window_lengths_s: [1.0, 1.0, 1.0],
        ..Default::default()
    });
    estimator.on_utilization(1.0);

    let schema = SensorSchema::LOAD;
    let mut published = None;
    {
        let mut publisher = LoadPublisher::new().with_sink(LoadWindow::OneMinute, |p: f32| {
            published = Some(schema.round_to_accuracy(p));
        });
        assert_eq!(publisher.publish(&estimator), 1);
    }

    // 1 - exp(-1) = 63.21%
    let published = published.unwrap();
    assert!((published - 63.2).abs() < 1e-4, "published {}", published);
}
