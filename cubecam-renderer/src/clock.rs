use web_time::Instant;

/// Measures the time elapsed between rendered frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameClock {
    last_frame: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of a frame, returning seconds since the previous one.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Like [`FrameClock::tick`], with an explicit timestamp. The first tick
    /// returns `0.0`.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);

        self.last_frame = Some(now);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn test_tick_returns_delta_seconds() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();

        clock.tick_at(t0);
        assert!((clock.tick_at(t0 + Duration::from_millis(16)) - 0.016).abs() < 1e-6);
        assert!((clock.tick_at(t0 + Duration::from_millis(66)) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();

        clock.tick_at(t0 + Duration::from_millis(10));
        assert_eq!(clock.tick_at(t0), 0.0);
    }
}
