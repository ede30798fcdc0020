//! Timing helpers driven by `requestAnimationFrame` timestamps (milliseconds).

/// Longest simulated step per frame. A backgrounded tab resumes with a huge
/// gap between timestamps; projectiles must not jump across the target.
pub const MAX_FRAME_DT: f64 = 0.05;

/// Countdown anchored at the `performance.now()` value a game started on.
#[derive(Clone, Copy, Debug)]
pub struct Countdown {
    duration_s: f64,
    start_ms: f64,
}

impl Countdown {
    pub fn new(duration_s: f64, now: f64) -> Self {
        Self { duration_s, start_ms: now }
    }

    pub fn elapsed_s(&self, now: f64) -> f64 {
        ((now - self.start_ms) / 1000.0).max(0.0)
    }

    pub fn time_left(&self, now: f64) -> f64 {
        (self.duration_s - self.elapsed_s(now)).max(0.0)
    }

    pub fn expired(&self, now: f64) -> bool {
        self.time_left(now) <= 0.0
    }

    /// Whole seconds shown in the HUD.
    pub fn display_seconds(&self, now: f64) -> u32 {
        self.time_left(now).ceil() as u32
    }
}

/// Converts successive frame timestamps into a clamped delta in seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStep {
    last_ms: Option<f64>,
}

impl FrameStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    pub fn advance(&mut self, now: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_ms = Some(now);
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_clamps_at_zero() {
        let c = Countdown::new(20.0, 1_000.0);
        assert_eq!(c.time_left(1_000.0), 20.0);
        assert!((c.time_left(6_000.0) - 15.0).abs() < 1e-9);
        assert_eq!(c.time_left(40_000.0), 0.0);
        assert!(c.expired(21_000.0));
        assert!(!c.expired(20_999.0));
    }

    #[test]
    fn display_rounds_up() {
        let c = Countdown::new(30.0, 0.0);
        assert_eq!(c.display_seconds(0.0), 30);
        assert_eq!(c.display_seconds(500.0), 30);
        assert_eq!(c.display_seconds(29_100.0), 1);
        assert_eq!(c.display_seconds(30_000.0), 0);
    }

    #[test]
    fn frame_step_first_frame_is_zero_and_clamped() {
        let mut step = FrameStep::new();
        assert_eq!(step.advance(100.0), 0.0);
        assert!((step.advance(116.0) - 0.016).abs() < 1e-9);
        assert_eq!(step.advance(5_000.0), MAX_FRAME_DT);
        step.reset();
        assert_eq!(step.advance(6_000.0), 0.0);
    }
}
