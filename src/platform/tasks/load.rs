//! Load sensor tasks (Embassy version)
//!
//! Async drivers for the two entry points of [`LoadSensorComponent`]. Embassy
//! tasks cannot be generic, so the firmware wraps these in its own
//! `#[embassy_executor::task]` functions:
//!
//! ```ignore
//! static LOAD_SENSOR: EmbassyState<LoadSensorComponent<TelemetrySink>> = ...;
//!
//! #[embassy_executor::task]
//! async fn load_polling_task() {
//!     run_load_polling(&LOAD_SENSOR).await
//! }
//!
//! #[embassy_executor::task]
//! async fn load_loop_hook_task() {
//!     run_load_loop_hook(&LOAD_SENSOR).await
//! }
//! ```

use embassy_time::{Duration, Ticker};
use load_sensor_core::load::LoadSink;

use crate::core::load::LoadSensorComponent;
use crate::core::traits::{EmbassyTime, SharedState};

/// Publish the averages every `LOAD_INTERVAL` milliseconds
pub async fn run_load_polling<S, T>(sensor: &T) -> !
where
    S: LoadSink,
    T: SharedState<LoadSensorComponent<S>>,
{
    let interval_ms = sensor.with(|component| component.update_interval_ms());
    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));

    loop {
        ticker.next().await;
        sensor.with_mut(|component| {
            component.update();
        });
    }
}

/// Record one loop pass per executor turn
///
/// The yield lets every other ready task run before the next timestamp is
/// taken, so each delta spans one full pass of the executor.
pub async fn run_load_loop_hook<S, T>(sensor: &T) -> !
where
    S: LoadSink,
    T: SharedState<LoadSensorComponent<S>>,
{
    let time = EmbassyTime;

    loop {
        sensor.with_mut(|component| {
            component.loop_hook_with(&time);
        });
        embassy_futures::yield_now().await;
    }
}
