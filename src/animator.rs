// Time-driven scalar interpolator.
// The host loop calls `tick(now)` at whatever cadence it runs; the animator
// only remembers when it started, so frame timing never accumulates error.

use std::time::{Duration, Instant};

use crate::easing::Easing;

#[derive(Debug, Clone)]
pub struct Animator {
    duration: Duration,
    easing: Easing,
    starting: f32,
    ending: f32,
    current: f32,
    started_at: Option<Instant>, // Some while running
}

impl Animator {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            starting: 0.0,
            ending: 0.0,
            current: 0.0,
            started_at: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn starting(&self) -> f32 {
        self.starting
    }

    pub fn set_starting(&mut self, value: f32) {
        self.starting = value;
    }

    pub fn ending(&self) -> f32 {
        self.ending
    }

    pub fn set_ending(&mut self, value: f32) {
        self.ending = value;
    }

    /// Last emitted value. Still valid after `stop()`.
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Begin (or restart) from `starting`.
    pub fn start(&mut self, now: Instant) {
        self.current = self.starting;
        self.started_at = Some(now);
    }

    /// Stop immediately; `current` keeps the last emitted value.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Fraction of the duration elapsed at `now`, clamped to 1.
    pub fn fraction(&self, now: Instant) -> Option<f32> {
        let started = self.started_at?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(started);
        Some((elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0))
    }

    /// Sample the animation. Returns the new value while running; the sample
    /// that reaches the end also stops the animator.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let t = self.fraction(now)?;
        self.current = self.starting + (self.ending - self.starting) * self.easing.apply(t);
        if t >= 1.0 {
            self.current = self.ending;
            self.started_at = None;
        }
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(ms: u64, from: f32, to: f32) -> Animator {
        let mut a = Animator::new(Duration::from_millis(ms), Easing::Linear);
        a.set_starting(from);
        a.set_ending(to);
        a
    }

    #[test]
    fn interpolates_and_settles() {
        let t0 = Instant::now();
        let mut a = linear(1000, -140.0, 0.0);
        assert_eq!(a.tick(t0), None);

        a.start(t0);
        assert!(a.running());
        assert_eq!(a.current(), -140.0);
        assert_eq!(a.tick(t0 + Duration::from_millis(250)), Some(-105.0));
        assert_eq!(a.tick(t0 + Duration::from_millis(1500)), Some(0.0));
        assert!(!a.running());
        assert_eq!(a.tick(t0 + Duration::from_millis(1600)), None);
    }

    #[test]
    fn stop_keeps_last_value() {
        let t0 = Instant::now();
        let mut a = linear(1000, 0.0, 100.0);
        a.start(t0);
        a.tick(t0 + Duration::from_millis(500));
        a.stop();
        assert!(!a.running());
        assert_eq!(a.current(), 50.0);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let t0 = Instant::now();
        let mut a = linear(0, 3.0, 9.0);
        a.start(t0);
        assert_eq!(a.tick(t0), Some(9.0));
        assert!(!a.running());
    }

    #[test]
    fn easing_shapes_progress() {
        let t0 = Instant::now();
        let mut a = Animator::new(Duration::from_millis(1000), Easing::CubicIn);
        a.set_ending(1000.0);
        a.start(t0);
        let v = a.tick(t0 + Duration::from_millis(500)).unwrap();
        assert!((v - 125.0).abs() < 0.01);
    }
}
