//! Progress tracking utilities
//!
//! This module provides a progress tracker for logging progress at regular intervals.
//! The tracker maintains an internal count and logs when interval boundaries are crossed.

use log::info;

use crate::logging::format_count;

/// Progress tracker for logging progress at regular intervals.
///
/// # Example
/// ```
/// use bam2fq_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Read records")
///     .with_interval(100);
///
/// for _ in 0..250 {
///     tracker.record(1);  // Logs at 100, 200
/// }
/// tracker.log_final();  // Logs "Read records 250 (complete)"
/// ```
#[derive(Debug)]
pub struct ProgressTracker {
    /// The logging interval - progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message.
    ///
    /// The tracker starts with a count of 0 and a default interval of 1,000,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000_000, message: message.into(), count: 0 }
    }

    /// Set the logging interval. An interval of 0 is treated as 1.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Add to the count, logging once for each interval boundary crossed.
    ///
    /// Returns `true` if the new count is exactly a multiple of the interval.
    pub fn record(&mut self, additional: u64) -> bool {
        let prev = self.count;
        self.count += additional;

        for i in (prev / self.interval + 1)..=(self.count / self.interval) {
            info!("{} {}", self.message, format_count(i * self.interval));
        }

        self.count > 0 && self.count.is_multiple_of(self.interval)
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Log the final count unless it was just logged at an interval boundary.
    pub fn log_final(&self) {
        if !self.count.is_multiple_of(self.interval) || self.count == 0 {
            info!("{} {} (complete)", self.message, format_count(self.count));
        }
    }
}
