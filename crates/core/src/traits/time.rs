//! Time abstraction for loop pass timestamps.
//!
//! The estimator itself only consumes plain `u64` microsecond timestamps;
//! this trait is how the component obtains them, so host tests can drive
//! the loop with synthetic time.

use core::cell::Cell;

/// Monotonic time since boot.
///
/// - `EmbassyTime` (in the root crate, `embassy` feature) on target
/// - `MockTime` for host testing with controllable time
///
/// No `Send`/`Sync` bound: every consumer runs inside the single
/// cooperative execution context.
///
/// # Example
///
/// ```
/// use load_sensor_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let start = time.now_us();
/// time.advance(16_000); // one idle loop pass
/// assert_eq!(time.elapsed_since(start), 16_000);
/// ```
pub trait TimeSource: Clone {
    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Returns elapsed microseconds since a reference point.
    ///
    /// Saturates to 0 when the reference lies in the future.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Mock time source with manually advanced time.
///
/// Clones are independent snapshots; share one instance by reference.
#[derive(Clone, Default, Debug)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self::with_initial(0)
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value.
    ///
    /// Setting an earlier time is allowed, to simulate clock irregularities.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time, saturating at `u64::MAX`.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get().saturating_add(us));
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_starts_at_initial() {
        assert_eq!(MockTime::new().now_us(), 0);

        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
        assert_eq!(time.now_ms(), 5_000);
    }

    #[test]
    fn mock_time_advance_and_set() {
        let time = MockTime::new();
        time.advance(16_000);
        time.advance(16_000);
        assert_eq!(time.now_us(), 32_000);

        // Clock stepping backwards
        time.set(1_000);
        assert_eq!(time.now_us(), 1_000);
    }

    #[test]
    fn mock_time_advance_saturates() {
        let time = MockTime::with_initial(u64::MAX - 1);
        time.advance(10);
        assert_eq!(time.now_us(), u64::MAX);
    }

    #[test]
    fn elapsed_since_saturates() {
        let time = MockTime::with_initial(1_000);
        assert_eq!(time.elapsed_since(400), 600);
        assert_eq!(time.elapsed_since(5_000), 0);
    }

    #[test]
    fn ms_rounds_down() {
        let time = MockTime::with_initial(1_999);
        assert_eq!(time.now_ms(), 1);
    }
}
