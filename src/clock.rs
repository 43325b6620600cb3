use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Elapsed-time sources
// ---------------------------------------------------------------------------

/// A stopwatch: seconds since the last `reset`.
///
/// The controller reads it once per update to get its time step and resets
/// it immediately afterwards.
pub trait ElapsedClock {
    /// Seconds elapsed since the last reset (or since construction).
    fn elapsed(&self) -> f64;

    /// Restart the measurement from zero.
    fn reset(&mut self);
}

/// Wall-clock stopwatch backed by the monotonic `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ElapsedClock for MonotonicClock {
    fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn reset(&mut self) {
        self.start = Instant::now();
    }
}

/// Deterministic stopwatch driven by hand.
///
/// Clones share the same "now", so a test (or the simulation runner) can keep
/// one handle and advance time while the controller owns another. Each clone
/// keeps its own reset mark.
///
/// ```
/// use clegg_pid::clock::{ElapsedClock, ManualClock};
///
/// let handle = ManualClock::new();
/// let mut owned = handle.clone();
/// handle.advance(0.25);
/// assert_eq!(owned.elapsed(), 0.25);
/// owned.reset();
/// assert_eq!(owned.elapsed(), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
    mark: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move shared time forward by `secs`.
    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn now(&self) -> f64 {
        self.now.get()
    }
}

impl ElapsedClock for ManualClock {
    fn elapsed(&self) -> f64 {
        self.now.get() - self.mark
    }

    fn reset(&mut self) {
        self.mark = self.now.get();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_shares_time_between_clones() {
        let handle = ManualClock::new();
        let mut a = handle.clone();
        let b = handle.clone();
        handle.advance(1.5);
        assert!((a.elapsed() - 1.5).abs() < 1e-12);
        assert!((b.elapsed() - 1.5).abs() < 1e-12);

        a.reset();
        handle.advance(0.5);
        assert!((a.elapsed() - 0.5).abs() < 1e-12);
        assert!((b.elapsed() - 2.0).abs() < 1e-12, "reset mark is per clone");
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let mut clock = MonotonicClock::new();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(first >= 0.0);
        assert!(second >= first);
        clock.reset();
        assert!(clock.elapsed() >= 0.0);
    }
}
