//! Support for timing persistence calls

use std::time::Instant;

/// Measures elapsed wall-clock time for a block of work
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start the clock
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time in seconds, rounded to the nearest millisecond
    pub fn duration_in_seconds(&self) -> f64 {
        (self.start.elapsed().as_secs_f64() * 1000.0).round() / 1000.0
    }
}
