use std::time::{Duration, Instant};

/// Timestamp of one presented frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Monotonic time since the window opened. Animation timestamps use this.
    pub since_start: Duration,
    /// Time since the previous frame; zero for the first.
    pub since_last: Duration,
    pub frame_index: u64,
}

/// Per-window monotonic clock.
///
/// Input callbacks and frames read the same epoch, so timestamps taken in
/// either are directly comparable.
#[derive(Debug, Clone)]
pub struct FrameClock {
    epoch: Instant,
    last_frame: Option<Duration>,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(epoch: Instant) -> Self {
        Self { epoch, last_frame: None, frames: 0 }
    }

    pub fn since_start(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.epoch)
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let since_start = self.elapsed_at(now);
        let since_last = self
            .last_frame
            .map_or(Duration::ZERO, |last| since_start.saturating_sub(last));
        self.last_frame = Some(since_start);

        let frame_index = self.frames;
        self.frames += 1;
        FrameTime { since_start, since_last, frame_index }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_counted_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
    }

    #[test]
    fn deltas_follow_the_timestamps() {
        let epoch = Instant::now();
        let mut clock = FrameClock::starting_at(epoch);

        let first = clock.tick_at(epoch + Duration::from_millis(40));
        assert_eq!(first.since_start, Duration::from_millis(40));
        assert_eq!(first.since_last, Duration::ZERO);

        let second = clock.tick_at(epoch + Duration::from_millis(56));
        assert_eq!(second.since_last, Duration::from_millis(16));
    }

    #[test]
    fn time_never_runs_backwards() {
        let epoch = Instant::now();
        let mut clock = FrameClock::starting_at(epoch + Duration::from_secs(1));
        assert_eq!(clock.tick_at(epoch).since_start, Duration::ZERO);
        assert!(clock.since_start() <= Duration::from_secs(1));
    }
}
