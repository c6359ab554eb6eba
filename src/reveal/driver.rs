use std::time::Duration;

use crate::history::artwork::Artwork;
use crate::history::store::KeyValueStore;
use crate::reveal::clock::Clock;
use crate::reveal::flow::{GenerationFlow, TickOutcome, TickToken};

/// Default frame cadence (~60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Frame interval from `PIXELFLOW_FRAME_MS`, else [`DEFAULT_FRAME_INTERVAL`].
pub fn frame_interval_from_env() -> Duration {
    std::env::var("PIXELFLOW_FRAME_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_FRAME_INTERVAL)
}

/// Drive the single tick chain of `flow` until it completes or is cancelled.
///
/// `on_frame` sees the revealed count after every pending tick. Returns the completed artwork,
/// or `None` if the chain was cancelled.
pub fn run_reveal<S, C, F>(
    flow: &mut GenerationFlow<S>,
    first: TickToken,
    clock: &C,
    interval: Duration,
    mut on_frame: F,
) -> Option<Artwork>
where
    S: KeyValueStore,
    C: Clock + ?Sized,
    F: FnMut(u32),
{
    let mut token = first;
    loop {
        match flow.tick(token, clock.now()) {
            TickOutcome::Pending { progress, next } => {
                on_frame(progress);
                token = next;
                clock.wait(interval);
            }
            TickOutcome::Completed { artwork } => return Some(artwork),
            TickOutcome::Cancelled => return None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/driver.rs"]
mod tests;
