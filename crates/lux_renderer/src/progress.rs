//! Progress reporting for long-running phases.

use std::time::{Duration, Instant};

/// Logs every 1% of completed jobs with an estimate of the time left.
///
/// The estimate multiplies the mean time between reports by the number of
/// reports still to come.
pub struct ProgressTracker {
    label: String,
    total: usize,
    completed: usize,
    step: usize,
    since_report: usize,
    durations: Vec<Duration>,
    last_report: Instant,
    started: Instant,
}

impl ProgressTracker {
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        let now = Instant::now();
        Self {
            label: label.into(),
            total,
            completed: 0,
            step: (total / 100).max(1),
            since_report: 0,
            durations: Vec::new(),
            last_report: now,
            started: now,
        }
    }

    /// Record one completed job.
    pub fn tick(&mut self) {
        self.completed += 1;
        self.since_report += 1;
        if self.since_report < self.step {
            return;
        }

        let now = Instant::now();
        self.durations.push(now - self.last_report);
        self.last_report = now;
        self.since_report = 0;

        log::info!(
            "{}: {}/{} ({:.0}%), remaining time estimation: {}",
            self.label,
            self.completed,
            self.total,
            self.percent(),
            format_duration(self.remaining())
        );
    }

    fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * self.completed as f64 / self.total as f64
        }
    }

    /// Mean duration between reports times the reports left.
    pub fn remaining(&self) -> Duration {
        if self.durations.is_empty() {
            return Duration::ZERO;
        }
        let mean = self.durations.iter().sum::<Duration>() / self.durations.len() as u32;
        let reports_left = self.total.saturating_sub(self.completed).div_ceil(self.step);
        mean * reports_left as u32
    }

    /// Log the total time of the phase and return it.
    pub fn finish(self) -> Duration {
        let elapsed = self.started.elapsed();
        log::info!("{}: finished in {}", self.label, format_duration(elapsed));
        elapsed
    }
}

/// Format as `"H h : M m : S s : MS ms"`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let ms = total_ms % 1000;
    let secs = (total_ms / 1000) % 60;
    let mins = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;
    format!("{hours} h : {mins} m : {secs} s : {ms} ms")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0 h : 0 m : 0 s : 0 ms");
        assert_eq!(
            format_duration(Duration::from_millis(3_723_045)),
            "1 h : 2 m : 3 s : 45 ms"
        );
        assert_eq!(format_duration(Duration::from_secs(90_000)), "25 h : 0 m : 0 s : 0 ms");
    }

    #[test]
    fn test_tracker_counts_and_reports() {
        let mut tracker = ProgressTracker::new("test", 250);
        assert_eq!(tracker.remaining(), Duration::ZERO);

        for _ in 0..125 {
            tracker.tick();
        }
        assert_eq!(tracker.completed, 125);
        assert_eq!(tracker.percent(), 50.0);
        // One report per 2 jobs
        assert_eq!(tracker.durations.len(), 62);
    }

    #[test]
    fn test_tracker_with_few_jobs() {
        let mut tracker = ProgressTracker::new("tiny", 3);
        for _ in 0..3 {
            tracker.tick();
        }
        assert_eq!(tracker.durations.len(), 3);
        assert_eq!(tracker.remaining(), Duration::ZERO);
        tracker.finish();
    }
}
