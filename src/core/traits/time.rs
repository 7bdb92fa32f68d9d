//! Time sources for loop pass timestamps.
//!
//! Re-exports the core `TimeSource` trait and provides the Embassy
//! implementation for target builds.

pub use load_sensor_core::traits::{MockTime, TimeSource};

/// Embassy-based time source using the Embassy time driver.
#[cfg(feature = "embassy")]
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

#[cfg(feature = "embassy")]
impl TimeSource for EmbassyTime {
    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }

    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
