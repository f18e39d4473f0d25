use std::time::{Duration, Instant};

/// Running average of the time between pushes to an output
///
/// The first update records a baseline. Every update counts one more frame
/// and sets the latency to the whole microseconds elapsed since the baseline
/// divided by the number of frames counted so far. The average is cumulative
/// until [`LatencyTracker::reset`] is called.
#[derive(Clone, Debug, Default)]
pub struct LatencyTracker {
    baseline: Option<Instant>,
    frame_count: u64,
    latency_micros: Option<u64>,
}

impl LatencyTracker {
    /// A tracker that has seen no frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame processed now
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Count a frame processed at `now`
    pub fn update_at(&mut self, now: Instant) {
        let baseline = *self.baseline.get_or_insert(now);

        self.frame_count += 1;

        let elapsed =
            u64::try_from(now.saturating_duration_since(baseline).as_micros()).unwrap_or(u64::MAX);
        self.latency_micros = Some(elapsed / self.frame_count);
    }

    /// The average time per frame, if any frame has been counted
    pub fn latency(&self) -> Option<Duration> {
        self.latency_micros.map(Duration::from_micros)
    }

    /// The average time per frame in whole microseconds
    pub fn latency_micros(&self) -> Option<u64> {
        self.latency_micros
    }

    /// The number of frames counted since the last reset
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Forget the baseline and every frame counted
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
