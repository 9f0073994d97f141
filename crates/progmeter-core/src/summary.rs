//! Aggregate counters and the summary line.
//!
//! The counters are independent of the item rows: work can be counted as
//! done without ever having been displayed, and failed rows never count.

use std::fmt;
use std::time::Duration;

/// Running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Units of work expected
    pub total: usize,
    /// Units of work completed
    pub done: usize,
}

impl Counters {
    /// Expect `n` more units of work.
    pub fn add_todos(&mut self, n: usize) {
        self.total = self.total.saturating_add(n);
    }

    /// Count one unit of work as completed.
    pub fn mark_done(&mut self) {
        self.done = self.done.saturating_add(1);
    }
}

/// Snapshot rendered on the summary line as `[done/total] Ns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Completed units
    pub done: usize,
    /// Expected units
    pub total: usize,
    /// Time since the meter was created
    pub elapsed: Duration,
}

impl Summary {
    /// Build a snapshot from counters and elapsed time.
    pub fn new(counters: Counters, elapsed: Duration) -> Self {
        Self {
            done: counters.done,
            total: counters.total,
            elapsed,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {}s",
            self.done,
            self.total,
            self.elapsed.as_secs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut counters = Counters::default();
        counters.add_todos(5);
        counters.mark_done();
        counters.mark_done();
        counters.mark_done();
        assert_eq!(counters, Counters { total: 5, done: 3 });
    }

    #[test]
    fn test_incremental_discovery() {
        let mut counters = Counters::default();
        counters.add_todos(2);
        counters.mark_done();
        counters.add_todos(3);
        assert_eq!(counters.total, 5);
        assert_eq!(counters.done, 1);
    }

    #[test]
    fn test_summary_format() {
        let summary = Summary::new(
            Counters { total: 5, done: 3 },
            Duration::from_millis(12_900),
        );
        assert_eq!(summary.to_string(), "[3/5] 12s");
    }
}
