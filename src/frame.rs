use std::time::{Duration, Instant};

/// Measures the time between consecutive frames.
pub struct FrameTimer {
    last_frame: Option<Instant>,
    max_delta: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            // Long stalls (window drag, breakpoints) would teleport the camera.
            max_delta: Duration::from_millis(250),
        }
    }

    /// Seconds since the previous tick, zero on the first one.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let delta = match self.last_frame.replace(now) {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };

        delta.min(self.max_delta).as_secs_f32()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn delta_between_ticks() {
        let mut timer = FrameTimer::new();
        let start = Instant::now();

        timer.tick_at(start);
        let dt = timer.tick_at(start + Duration::from_millis(16));

        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn stalls_are_capped() {
        let mut timer = FrameTimer::new();
        let start = Instant::now();

        timer.tick_at(start);
        assert_eq!(timer.tick_at(start + Duration::from_secs(3)), 0.25);
    }
}
