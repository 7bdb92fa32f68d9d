//! Task run-time counter sampling
//!
//! Platforms running an RTOS underneath the cooperative loop can report
//! accumulated run-time ticks per task as a text table, one task per line:
//!
//! ```text
//! loopTask        123456          42%
//! IDLE0           987654          57%
//! ```
//!
//! Tasks named `IDLE*` count as idle time, everything else as active time.
//! Utilization is the active share of the ticks elapsed between two
//! snapshots.

/// Prefix identifying idle tasks
const IDLE_TASK_PREFIX: &str = "IDLE";

/// Accumulated tick counters from one run-time stats snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeCounters {
    /// Ticks spent in non-idle tasks
    pub active_ticks: u32,
    /// Ticks spent in idle tasks
    pub idle_ticks: u32,
}

/// Parse a run-time stats table into active/idle tick totals
///
/// Fields are whitespace-separated, so a task name containing a space
/// shifts its columns; lines that do not then have the `name count percent%`
/// shape are skipped.
/// Totals wrap like the underlying 32-bit counters.
pub fn parse_runtime_stats(text: &str) -> RuntimeCounters {
    let mut counters = RuntimeCounters::default();

    for line in text.lines() {
        let Some((name, count)) = parse_line(line) else {
            continue;
        };

        if name.starts_with(IDLE_TASK_PREFIX) {
            counters.idle_ticks = counters.idle_ticks.wrapping_add(count);
        } else {
            counters.active_ticks = counters.active_ticks.wrapping_add(count);
        }
    }

    counters
}

fn parse_line(line: &str) -> Option<(&str, u32)> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let count = fields.next()?.parse::<u32>().ok()?;
    let percent = fields.next()?;
    percent
        .trim_end_matches('%')
        .trim_start_matches('<')
        .parse::<u32>()
        .ok()?;
    Some((name, count))
}

/// Wrap-aware difference of two 32-bit tick counters
#[inline]
pub fn tick_delta(current: u32, previous: u32) -> u32 {
    current.wrapping_sub(previous)
}

/// Turns consecutive counter snapshots into utilization ratios
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeStatsSampler {
    last: Option<RuntimeCounters>,
}

impl RuntimeStatsSampler {
    /// Create a sampler with no previous snapshot
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record a snapshot
    ///
    /// # Returns
    ///
    /// Active share of ticks elapsed since the previous snapshot, or `None`
    /// for the first snapshot and when no ticks elapsed
    pub fn sample(&mut self, counters: RuntimeCounters) -> Option<f32> {
        let previous = self.last.replace(counters)?;

        let delta_active = tick_delta(counters.active_ticks, previous.active_ticks) as u64;
        let delta_idle = tick_delta(counters.idle_ticks, previous.idle_ticks) as u64;
        let delta_total = delta_active + delta_idle;

        if delta_total == 0 {
            return None;
        }

        Some((delta_active as f32 / delta_total as f32).clamp(0.0, 1.0))
    }

    /// Parse a stats table and record it
    pub fn sample_text(&mut self, text: &str) -> Option<f32> {
        self.sample(parse_runtime_stats(text))
    }

    /// Forget the previous snapshot
    pub fn reset(&mut self) {
        self.last = None;
    }
}
