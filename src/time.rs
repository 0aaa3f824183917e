//! Time facilities for the engine and its host.
//!
//! The engine never reads the wall clock itself. Hosts measure frame time
//! with [`FrameClock`] and hand the delta to the engine, which advances its
//! own clock and feeds the simulator through a [`FixedStep`]. Event throttles
//! and the transition lock read that engine clock, so the whole engine is
//! deterministic under a scripted sequence of deltas.
//!
//! # Example
//!
//! ```ignore
//! use particle_nav::time::{FixedStep, FrameClock};
//!
//! let mut clock = FrameClock::new();
//! let mut stepper = FixedStep::new(60.0, 5);
//!
//! // In your frame loop:
//! let dt = clock.update();
//! for _ in 0..stepper.advance(dt) {
//!     // one reference tick
//! }
//! ```

use std::time::{Duration, Instant};

/// Fixed-timestep accumulator.
///
/// Turns variable frame deltas into a whole number of reference ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Length of one tick in seconds.
    step: f32,
    /// Unconsumed time in seconds.
    accumulator: f32,
    /// Most ticks returned by a single `advance`.
    max_substeps: u32,
}

impl FixedStep {
    /// Create an accumulator running `rate` ticks per second.
    pub fn new(rate: f32, max_substeps: u32) -> Self {
        Self {
            step: 1.0 / rate.max(f32::EPSILON),
            accumulator: 0.0,
            max_substeps: max_substeps.max(1),
        }
    }

    /// Add `dt` seconds and return how many ticks are now due.
    ///
    /// When more than `max_substeps` ticks are due the backlog is dropped,
    /// keeping only the fractional remainder.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator %= self.step;
        }
        ticks
    }
}

/// Minimum-interval gate for high-frequency events.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` and records `now` if at least one interval has passed
    /// since the last accepted call. The first call is always accepted.
    pub fn ready(&mut self, now: Duration) -> bool {
        match self.last {
            Some(last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Wall-clock frame timing for hosts.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Mark a new frame. Returns seconds since the previous one.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
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
    use std::thread;

    #[test]
    fn test_fixed_step_accumulates() {
        let mut stepper = FixedStep::new(60.0, 5);
        assert_eq!(stepper.advance(1.0 / 120.0), 0);
        assert_eq!(stepper.advance(1.0 / 120.0 + 1e-4), 1);
        assert_eq!(stepper.advance(1.0 / 120.0), 0);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut stepper = FixedStep::new(60.0, 5);
        assert_eq!(stepper.advance(1.0), 5);
        // The backlog was dropped, not carried.
        assert_eq!(stepper.advance(0.0), 0);
    }

    #[test]
    fn test_fixed_step_ignores_bad_deltas() {
        let mut stepper = FixedStep::new(60.0, 5);
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.advance(f32::NAN), 0);
        assert_eq!(stepper.advance(1.0 / 60.0 + 1e-4), 1);
    }

    #[test]
    fn test_throttle() {
        let mut throttle = Throttle::new(Duration::from_millis(16));
        assert!(throttle.ready(Duration::from_millis(100)));
        assert!(!throttle.ready(Duration::from_millis(110)));
        assert!(throttle.ready(Duration::from_millis(116)));
        assert!(!throttle.ready(Duration::from_millis(117)));
    }

    #[test]
    fn test_frame_clock_update() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        let dt = clock.update();
        assert!(dt > 0.0);
        assert_eq!(clock.frame(), 1);
    }
}
