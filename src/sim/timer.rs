//! Cooldown / interval timer
//!
//! Accumulates elapsed simulation seconds and reports when a duration has passed.
//! Polled every tick; nothing here blocks or schedules callbacks.

/// Slack for float accumulation (e.g. three 1/60s steps summing to 0.04999)
const READY_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    pub duration: f32,
    pub elapsed: f32,
}

impl Timer {
    /// A timer that becomes ready after `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    /// A timer that starts out ready (e.g. a weapon that may fire immediately)
    pub fn primed(duration: f32) -> Self {
        Self {
            duration,
            elapsed: duration,
        }
    }

    #[inline]
    pub fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt;
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.elapsed + READY_EPSILON >= self.duration
    }

    #[inline]
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Reset with a new duration
    pub fn restart(&mut self, duration: f32) {
        self.duration = duration;
        self.elapsed = 0.0;
    }

    /// Fraction of the duration elapsed, clamped to 0..=1
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_ready_after_duration() {
        let mut t = Timer::new(0.5);
        assert!(!t.is_ready());
        t.update(0.25);
        assert!(!t.is_ready());
        t.update(0.25);
        assert!(t.is_ready());
    }

    #[test]
    fn test_reset_clears_ready() {
        let mut t = Timer::primed(1.0);
        assert!(t.is_ready());
        t.reset();
        assert!(!t.is_ready());
        assert_eq!(t.elapsed, 0.0);
    }

    #[test]
    fn test_tick_accumulation_hits_frame_interval() {
        // 50ms at 60 Hz is three ticks even with f32 rounding
        let mut t = Timer::new(0.05);
        for _ in 0..3 {
            t.update(SIM_DT);
        }
        assert!(t.is_ready());
    }

    #[test]
    fn test_elapsed_never_decreases() {
        let mut t = Timer::new(1.0);
        t.update(0.3);
        t.update(-5.0);
        assert_eq!(t.elapsed, 0.3);
        assert!((t.progress() - 0.3).abs() < 1e-6);
    }
}
