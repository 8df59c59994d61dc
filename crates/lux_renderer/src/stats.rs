//! Intersection counters for benchmarking.
//!
//! With the `benchmarking` feature every bounds test, figure test and
//! traced ray bumps a relaxed atomic counter. Without it the counting
//! functions are empty and compile away.

#[cfg(feature = "benchmarking")]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "benchmarking")]
static BOUNDS_TESTS: AtomicU64 = AtomicU64::new(0);
#[cfg(feature = "benchmarking")]
static FIGURE_TESTS: AtomicU64 = AtomicU64::new(0);
#[cfg(feature = "benchmarking")]
static RAYS_TRACED: AtomicU64 = AtomicU64::new(0);

/// Snapshot of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub bounds_tests: u64,
    pub figure_tests: u64,
    pub rays_traced: u64,
}

#[inline]
pub fn count_bounds_test() {
    #[cfg(feature = "benchmarking")]
    BOUNDS_TESTS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn count_figure_test() {
    #[cfg(feature = "benchmarking")]
    FIGURE_TESTS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn count_ray_traced() {
    #[cfg(feature = "benchmarking")]
    RAYS_TRACED.fetch_add(1, Ordering::Relaxed);
}

/// Current counter values; all zero without the `benchmarking` feature.
pub fn snapshot() -> Statistics {
    #[cfg(feature = "benchmarking")]
    {
        Statistics {
            bounds_tests: BOUNDS_TESTS.load(Ordering::Relaxed),
            figure_tests: FIGURE_TESTS.load(Ordering::Relaxed),
            rays_traced: RAYS_TRACED.load(Ordering::Relaxed),
        }
    }
    #[cfg(not(feature = "benchmarking"))]
    {
        Statistics::default()
    }
}

/// Reset every counter to zero.
pub fn reset() {
    #[cfg(feature = "benchmarking")]
    {
        BOUNDS_TESTS.store(0, Ordering::Relaxed);
        FIGURE_TESTS.store(0, Ordering::Relaxed);
        RAYS_TRACED.store(0, Ordering::Relaxed);
    }
}

/// Log the counters at the end of a phase.
pub fn log_statistics(phase: &str) {
    if !cfg!(feature = "benchmarking") {
        return;
    }

    let stats = snapshot();
    log::info!(
        "{phase}: {} rays traced, {} bounds tests, {} figure tests",
        stats.rays_traced,
        stats.bounds_tests,
        stats.figure_tests
    );
    if stats.rays_traced > 0 {
        log::info!(
            "{phase}: {:.2} bounds tests and {:.2} figure tests per ray",
            stats.bounds_tests as f64 / stats.rays_traced as f64,
            stats.figure_tests as f64 / stats.rays_traced as f64
        );
    }
}
