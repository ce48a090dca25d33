//! Frame scheduler
//!
//! Turns host frame callbacks into the elapsed time, in milliseconds, that
//! the animation loop consumes.

use std::time::Duration;

/// Smallest accepted fixed step
pub const MIN_STEP_MS: f64 = 0.1;
/// Steps taken by one `advance` at most; time beyond that is dropped
pub const MAX_STEPS_PER_ADVANCE: u32 = 240;

/// How real time is turned into elapsed animation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestep {
    /// Elapsed time follows real time (times the scale) every frame
    Variable,
    /// Elapsed time moves in whole steps of `step_ms`; remainders carry over
    Fixed { step_ms: f64 },
}

pub struct FrameScheduler {
    timestep: Timestep,
    time_scale: f64,
    is_paused: bool,
    elapsed_ms: f64,
    accumulated_ms: f64,
    last_steps: u32,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(Timestep::Variable)
    }
}

impl FrameScheduler {
    pub fn new(timestep: Timestep) -> Self {
        Self {
            timestep: sanitize(timestep),
            time_scale: 1.0,
            is_paused: false,
            elapsed_ms: 0.0,
            accumulated_ms: 0.0,
            last_steps: 0,
        }
    }

    /// Feeds one frame's worth of real time and returns the elapsed time
    pub fn advance(&mut self, real_delta: Duration) -> f64 {
        self.last_steps = 0;
        if self.is_paused {
            return self.elapsed_ms;
        }

        let scaled = real_delta.as_secs_f64() * 1000.0 * self.time_scale;
        match self.timestep {
            Timestep::Variable => {
                self.elapsed_ms += scaled;
                self.last_steps = 1;
            }
            Timestep::Fixed { step_ms } => {
                self.accumulated_ms += scaled;
                let due = (self.accumulated_ms / step_ms).floor();
                if due > f64::from(MAX_STEPS_PER_ADVANCE) {
                    log::debug!("Dropping {:.1} ms of backlog", self.accumulated_ms);
                    self.last_steps = MAX_STEPS_PER_ADVANCE;
                    self.elapsed_ms += f64::from(MAX_STEPS_PER_ADVANCE) * step_ms;
                    self.accumulated_ms = 0.0;
                } else {
                    self.last_steps = due as u32;
                    self.elapsed_ms += due * step_ms;
                    self.accumulated_ms -= due * step_ms;
                }
            }
        }
        self.elapsed_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Number of steps taken by the most recent `advance`
    pub fn last_steps(&self) -> u32 {
        self.last_steps
    }

    pub fn pause(&mut self) {
        self.is_paused = true;
    }

    pub fn resume(&mut self) {
        self.is_paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Negative scales would run time backwards and are clamped to zero
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    pub fn set_timestep(&mut self, timestep: Timestep) {
        self.timestep = sanitize(timestep);
        self.accumulated_ms = 0.0;
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.accumulated_ms = 0.0;
        self.last_steps = 0;
    }
}

fn sanitize(timestep: Timestep) -> Timestep {
    match timestep {
        Timestep::Fixed { step_ms } if !(step_ms.is_finite() && step_ms >= MIN_STEP_MS) => {
            log::warn!("Ignoring fixed step of {} ms, using a variable timestep", step_ms);
            Timestep::Variable
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_variable_timestep_follows_real_time() {
        let mut scheduler = FrameScheduler::default();
        scheduler.advance(Duration::from_millis(16));
        let t = scheduler.advance(Duration::from_millis(17));
        assert_relative_eq!(t, 33.0, epsilon = 1e-9);
        assert_eq!(scheduler.last_steps(), 1);
    }

    #[test]
    fn test_fixed_timestep_advances_in_whole_steps() {
        let mut scheduler = FrameScheduler::new(Timestep::Fixed { step_ms: 10.0 });

        assert_relative_eq!(scheduler.advance(Duration::from_millis(25)), 20.0, epsilon = 1e-9);
        assert_eq!(scheduler.last_steps(), 2);

        // the 5 ms remainder carries into this frame
        assert_relative_eq!(scheduler.advance(Duration::from_millis(6)), 30.0, epsilon = 1e-9);
        assert_eq!(scheduler.last_steps(), 1);

        assert_relative_eq!(scheduler.advance(Duration::from_millis(3)), 30.0, epsilon = 1e-9);
        assert_eq!(scheduler.last_steps(), 0);
    }

    #[test]
    fn test_pause_freezes_elapsed_time() {
        let mut scheduler = FrameScheduler::default();
        scheduler.advance(Duration::from_millis(100));
        scheduler.pause();
        assert_relative_eq!(scheduler.advance(Duration::from_secs(5)), 100.0);
        scheduler.resume();
        assert_relative_eq!(scheduler.advance(Duration::from_millis(50)), 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_time_scale_is_never_negative() {
        let mut scheduler = FrameScheduler::default();
        scheduler.set_time_scale(-2.0);
        assert_eq!(scheduler.time_scale(), 0.0);

        let before = scheduler.advance(Duration::from_millis(10));
        let after = scheduler.advance(Duration::from_millis(10));
        assert!(after >= before);

        scheduler.set_time_scale(2.0);
        assert_relative_eq!(scheduler.advance(Duration::from_millis(10)), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_and_invalid_step() {
        let mut scheduler = FrameScheduler::new(Timestep::Fixed { step_ms: 0.0 });
        assert_eq!(scheduler.timestep(), Timestep::Variable);

        scheduler.advance(Duration::from_millis(40));
        scheduler.reset();
        assert_eq!(scheduler.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_tiny_fixed_step_falls_back_to_variable() {
        let mut scheduler = FrameScheduler::new(Timestep::Fixed { step_ms: 1e-300 });
        assert_eq!(scheduler.timestep(), Timestep::Variable);
        assert_relative_eq!(scheduler.advance(Duration::from_millis(16)), 16.0, epsilon = 1e-9);

        scheduler.set_timestep(Timestep::Fixed { step_ms: 1e-6 });
        assert_eq!(scheduler.timestep(), Timestep::Variable);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut scheduler = FrameScheduler::new(Timestep::Fixed { step_ms: MIN_STEP_MS });
        let t = scheduler.advance(Duration::from_secs(60));
        assert_eq!(scheduler.last_steps(), MAX_STEPS_PER_ADVANCE);
        assert_relative_eq!(t, f64::from(MAX_STEPS_PER_ADVANCE) * MIN_STEP_MS, epsilon = 1e-9);

        // the dropped backlog does not spill into the next frame
        scheduler.advance(Duration::ZERO);
        assert_eq!(scheduler.last_steps(), 0);
    }
}
