use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::foundation::core::GridSize;

/// Wall-clock length of a full reveal.
///
/// Only the two supported board sizes are defined; there is no general formula.
pub fn reveal_duration(grid_size: GridSize) -> Duration {
    match grid_size {
        GridSize::Fifty => Duration::from_millis(15_000),
        GridSize::Hundred => Duration::from_millis(60_000),
    }
}

/// Revealed socket count after `elapsed`: `floor(elapsed / duration * side²)`, clamped.
pub fn progress_for_elapsed(elapsed: Duration, grid_size: GridSize) -> u32 {
    let total = grid_size.cell_count();
    let duration = reveal_duration(grid_size).as_nanos();
    let revealed = elapsed.as_nanos().saturating_mul(u128::from(total)) / duration;
    revealed.min(u128::from(total)) as u32
}

/// Monotonic time source used to drive reveals.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Block (or advance) until the next frame should be produced.
    fn wait(&self, interval: Duration);
}

/// Real time, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose origin is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wait(&self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Hand-driven clock; `wait` advances time instead of sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time.
    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn wait(&self, interval: Duration) {
        self.advance(interval);
    }
}

/// One reveal cycle, anchored at a start timestamp captured once.
///
/// Progress is recomputed from elapsed time on every query, so dropped or late frames never
/// make the reveal fall behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealClock {
    grid_size: GridSize,
    start: Duration,
}

impl RevealClock {
    /// Start a cycle at `now`.
    pub fn start(grid_size: GridSize, now: Duration) -> Self {
        Self { grid_size, start: now }
    }

    /// Board being revealed.
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Total steps in this cycle.
    pub fn total(&self) -> u32 {
        self.grid_size.cell_count()
    }

    /// Full duration of this cycle.
    pub fn duration(&self) -> Duration {
        reveal_duration(self.grid_size)
    }

    /// Revealed count at `now`. Times before the start count as zero elapsed.
    pub fn progress_at(&self, now: Duration) -> u32 {
        progress_for_elapsed(now.saturating_sub(self.start), self.grid_size)
    }

    /// `true` once every step is revealed.
    pub fn is_complete_at(&self, now: Duration) -> bool {
        self.progress_at(now) >= self.total()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/clock.rs"]
mod tests;
