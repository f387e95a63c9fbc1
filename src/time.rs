use std::time::{Duration, Instant};

/// Spikes longer than this (debugger pause, window drag) are clamped so guest
/// scripts never see a multi-second delta.
const MAX_DELTA: Duration = Duration::from_millis(250);

pub struct Time {
    start: Instant,
    last: Instant,
    delta: Duration,
    frame: u64,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now, delta: Duration::ZERO, frame: 0 }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = (now - self.last).min(MAX_DELTA);
        self.last = now;
        self.frame += 1;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.last.duration_since(self.start).as_secs_f32()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
