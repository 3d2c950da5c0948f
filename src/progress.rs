//! Shared progress accounting for the worker pool.
//!
//! Counters are lock-free atomics so fifty workers can bump them without
//! contention; only the periodic render takes a lock, and only to keep
//! concurrent writers from interleaving output on the same line.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use colored::Colorize;

/// How often the progress line is refreshed, in processed units.
const RENDER_EVERY: usize = 10;

/// Thread-safe progress state for one run. `total` is fixed at construction
/// (host count × 2, one unit per scheme); `processed` and `working` only
/// ever go up.
pub struct ProgressTracker {
    total: usize,
    processed: AtomicUsize,
    working: AtomicUsize,
    started: Instant,
    display_lock: Mutex<()>,
    quiet: bool,
    accessible: bool,
}

impl ProgressTracker {
    /// Starts a tracker for `total_units` probes; the clock starts here.
    #[must_use]
    pub fn new(total_units: usize, quiet: bool, accessible: bool) -> Self {
        Self {
            total: total_units,
            processed: AtomicUsize::new(0),
            working: AtomicUsize::new(0),
            started: Instant::now(),
            display_lock: Mutex::new(()),
            quiet,
            accessible,
        }
    }

    /// Records one finished probe. Every [`RENDER_EVERY`]th unit refreshes
    /// the progress line.
    pub fn update(&self, is_working: bool) {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if is_working {
            self.working.fetch_add(1, Ordering::Relaxed);
        }

        if processed % RENDER_EVERY == 0 {
            self.display_progress();
        }
    }

    /// Units processed so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    /// Units that proved working so far.
    #[must_use]
    pub fn working(&self) -> usize {
        self.working.load(Ordering::Relaxed)
    }

    /// Renders the in-place progress line: percent complete, working count,
    /// elapsed seconds and ETA. Serialized by the display lock.
    pub fn display_progress(&self) {
        if self.quiet {
            return;
        }

        let _guard = self.display_lock.lock().unwrap();
        let processed = self.processed();
        let working = self.working();
        let elapsed = self.started.elapsed().as_secs();
        let percent = if self.total == 0 {
            100.0
        } else {
            processed as f64 / self.total as f64 * 100.0
        };
        let eta = eta_seconds(self.total, processed, elapsed);

        let line = format!(
            "{processed}/{} ({percent:.1}%) | Working: {working} | Elapsed: {elapsed}s | ETA: {eta}s",
            self.total
        );

        if self.accessible {
            // Plain full lines; no in-place rewriting for screen readers.
            println!("{line}");
        } else {
            print!("\r{} {line}          ", "Progress:".cyan().bold());
            let _ = io::stdout().flush();
        }
    }

    /// Prints the end-of-run block: total time, working and processed
    /// counts, and request throughput.
    pub fn final_summary(&self, total_secs: f64) {
        if self.quiet {
            return;
        }

        let processed = self.processed();
        let throughput = if total_secs > 0.0 {
            processed as f64 / total_secs
        } else {
            0.0
        };

        println!("\n");
        println!("{}", "SCAN SUMMARY".bold());
        println!("{}", "============".bold());
        println!("Total scan time: {total_secs:.1}s");
        println!("Working hosts: {}", self.working().to_string().green());
        println!("Processed: {processed} requests");
        println!("Speed: {throughput:.1} requests/second");
        println!();
    }
}

/// Remaining-time estimate. Defined as 0 before any unit completes, so the
/// very first render can never divide by zero.
#[must_use]
pub fn eta_seconds(total: usize, processed: usize, elapsed_secs: u64) -> u64 {
    if processed == 0 {
        return 0;
    }
    (total.saturating_sub(processed) as u64) * elapsed_secs / processed as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_updates() {
        let tracker = ProgressTracker::new(8, true, false);
        tracker.update(true);
        tracker.update(false);
        tracker.update(true);

        assert_eq!(tracker.processed(), 3);
        assert_eq!(tracker.working(), 2);
    }

    #[test]
    fn counters_are_safe_under_concurrent_updates() {
        let tracker = std::sync::Arc::new(ProgressTracker::new(4000, true, false));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = std::sync::Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                for i in 0..500 {
                    tracker.update(i % 2 == 0);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.processed(), 4000);
        assert_eq!(tracker.working(), 2000);
    }

    #[test]
    fn eta_guards_against_zero_processed() {
        assert_eq!(eta_seconds(100, 0, 30), 0);
    }

    #[test]
    fn eta_shrinks_toward_completion() {
        // 50 done in 10s leaves 50 more at the same pace.
        assert_eq!(eta_seconds(100, 50, 10), 10);
        assert_eq!(eta_seconds(100, 100, 10), 0);
        // Overshoot (duplicates would violate invariants upstream, but the
        // arithmetic must not wrap).
        assert_eq!(eta_seconds(100, 120, 10), 0);
    }
}
