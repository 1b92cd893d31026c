//! Time management utilities
//!
//! The physics core itself only ever sees a `delta_time` per call. These
//! helpers belong to whatever outer loop drives it: a fixed-timestep
//! accumulator that decides how many physics steps a wall-clock frame gets,
//! and a stopwatch for timing those steps.

use std::time::{Duration, Instant};

/// Fixed-timestep accumulator
///
/// Feed it real frame time with [`FixedTimestep::advance`]; it returns how many
/// fixed steps to run. Leftover time carries into the next frame.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator with the given step length (seconds) and a cap on
    /// steps per frame
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Length of one fixed step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add frame time and return the number of fixed steps to simulate
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }

        // Drop the backlog rather than spiralling when the loop falls behind
        if self.accumulator >= self.step {
            log::debug!(
                "fixed timestep dropped {:.4}s of backlog",
                self.accumulator
            );
            self.accumulator = 0.0;
        }
        steps
    }

    /// Interpolation factor between the last two fixed steps
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 4)
    }
}

/// Simple stopwatch for measuring elapsed time
#[derive(Debug, Default)]
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            elapsed: Duration::ZERO,
        }
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_timestep_carries_remainder() {
        let mut timestep = FixedTimestep::new(0.1, 8);
        assert_eq!(timestep.advance(0.25), 2);
        assert_relative_eq!(timestep.alpha(), 0.5, epsilon = 1e-4);
        assert_eq!(timestep.advance(0.06), 1);
        assert_eq!(timestep.advance(0.0), 0);
    }

    #[test]
    fn test_fixed_timestep_caps_substeps() {
        let mut timestep = FixedTimestep::new(0.1, 2);
        assert_eq!(timestep.advance(1.0), 2);
        // Backlog was dropped
        assert_eq!(timestep.advance(0.0), 0);
    }

    #[test]
    fn test_stopwatch_accumulates() {
        let mut stopwatch = Stopwatch::start_new();
        stopwatch.stop();
        let first = stopwatch.elapsed();
        assert_eq!(stopwatch.elapsed(), first);
    }
}
